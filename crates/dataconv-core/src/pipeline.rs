//! Per-document extraction pipeline.
//!
//! Text is obtained in the default extraction mode, its language detected,
//! and, when that language maps to a different mode, extracted again in that
//! mode. The final text then flows through parsing, category filtering, code
//! enrichment and record assembly.

use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

use tracing::{debug, info};

use crate::error::Result;
use crate::fields::FieldParser;
use crate::language::{LanguageDetector, LinguaDetector};
use crate::models::config::DataconvConfig;
use crate::models::record::{ExtractionMode, LanguageTag, OutputRecord};
use crate::products::{CodeEnricher, ProductFilter};
use crate::record::RecordAssembler;

/// Source of document text, parameterized by an extraction mode.
///
/// Must return an empty string for documents without text and only fail on
/// I/O-level problems. Implementations own any expensive engine state and
/// must tolerate repeated calls.
pub trait TextExtractor {
    fn extract(&self, document: &Path, mode: &ExtractionMode) -> Result<String>;
}

/// Outcome of running the pipeline on one document.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    /// Assembled record.
    pub record: OutputRecord,
    /// Language detected on the first-pass text.
    pub language: LanguageTag,
    /// Mode the final text was extracted with.
    pub mode: ExtractionMode,
    /// Whether the document was extracted a second time.
    pub re_extracted: bool,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Orchestrates detection, parsing, filtering, enrichment and assembly.
pub struct ExtractionPipeline<D: LanguageDetector = LinguaDetector> {
    detector: D,
    parser: FieldParser,
    filter: ProductFilter,
    enricher: CodeEnricher,
    assembler: RecordAssembler,
    modes: HashMap<LanguageTag, ExtractionMode>,
    default_mode: ExtractionMode,
}

impl ExtractionPipeline<LinguaDetector> {
    /// Build a pipeline with a lingua detector from configuration.
    pub fn from_config(config: &DataconvConfig) -> Self {
        let detector = LinguaDetector::from_config(&config.languages);
        ExtractionPipeline::with_detector(config, detector)
    }
}

impl<D: LanguageDetector> ExtractionPipeline<D> {
    /// Build a pipeline around a given language detector.
    pub fn with_detector(config: &DataconvConfig, detector: D) -> Self {
        let modes = config
            .languages
            .modes
            .iter()
            .map(|(lang, mode)| (LanguageTag::new(lang), ExtractionMode::new(mode)))
            .collect();

        Self {
            detector,
            parser: FieldParser::from_config(&config.parsing),
            filter: ProductFilter::new(&config.categories),
            enricher: CodeEnricher::from_config(&config.codes),
            assembler: RecordAssembler::new(),
            modes,
            default_mode: ExtractionMode::new(&config.languages.default_mode),
        }
    }

    /// Mode used for the first pass.
    pub fn default_mode(&self) -> &ExtractionMode {
        &self.default_mode
    }

    /// Extraction mode for a language; the default mode when unmapped.
    pub fn mode_for(&self, language: &LanguageTag) -> &ExtractionMode {
        self.modes.get(language).unwrap_or(&self.default_mode)
    }

    /// Category filter in use.
    pub fn filter(&self) -> &ProductFilter {
        &self.filter
    }

    /// Run the pipeline on one document and return its record.
    ///
    /// Extractor failures propagate; everything after extraction is infallible.
    pub fn process<E: TextExtractor + ?Sized>(
        &self,
        extractor: &E,
        document: &Path,
        category: &str,
    ) -> Result<OutputRecord> {
        self.run(extractor, document, category).map(|run| run.record)
    }

    /// Like [`ExtractionPipeline::process`], also reporting language and mode.
    pub fn run<E: TextExtractor + ?Sized>(
        &self,
        extractor: &E,
        document: &Path,
        category: &str,
    ) -> Result<PipelineRun> {
        let start = Instant::now();
        info!("Processing {} (category {:?})", document.display(), category);

        let first_pass = extractor.extract(document, &self.default_mode)?;
        let language = self.detector.detect(&first_pass);
        let mode = self.mode_for(&language).clone();

        let (text, re_extracted) = if mode != self.default_mode {
            debug!(
                "Language {} maps to mode {}, extracting {} again",
                language,
                mode,
                document.display()
            );
            (extractor.extract(document, &mode)?, true)
        } else {
            debug!("Language {} uses default mode {}", language, mode);
            (first_pass, false)
        };

        let record = self.process_text(&text, category);
        let processing_time_ms = start.elapsed().as_millis() as u64;

        debug!(
            "Finished {} in {}ms: company={:?}, products={:?}",
            document.display(),
            processing_time_ms,
            record.company_name,
            record.products
        );

        Ok(PipelineRun {
            record,
            language,
            mode,
            re_extracted,
            processing_time_ms,
        })
    }

    /// Parse, filter, enrich and assemble text that is already extracted.
    pub fn process_text(&self, text: &str, category: &str) -> OutputRecord {
        let fields = self.parser.parse(text);
        let retained = self.filter.filter(&fields.candidate_products, category);
        let enriched = self.enricher.enrich(&retained);
        self.assembler.assemble(&fields, &enriched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use crate::error::DataconvError;
    use crate::language::FixedLanguage;
    use pretty_assertions::assert_eq;

    const CARD: &str = "Acme Group Inc.\nTel: +1-555-0100\ncontact@acme.com\nPVC Resin\nCalcium Chloride\nSugar";

    /// Returns canned text per mode and records every call.
    struct FakeExtractor {
        texts: HashMap<String, String>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeExtractor {
        fn new(texts: &[(&str, &str)]) -> Self {
            Self {
                texts: texts
                    .iter()
                    .map(|(m, t)| (m.to_string(), t.to_string()))
                    .collect(),
                calls: RefCell::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl TextExtractor for FakeExtractor {
        fn extract(&self, _document: &Path, mode: &ExtractionMode) -> Result<String> {
            self.calls.borrow_mut().push(mode.to_string());
            Ok(self.texts.get(mode.as_str()).cloned().unwrap_or_default())
        }
    }

    struct FailingExtractor;

    impl TextExtractor for FailingExtractor {
        fn extract(&self, document: &Path, _mode: &ExtractionMode) -> Result<String> {
            Err(DataconvError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} not found", document.display()),
            )))
        }
    }

    fn pipeline(language: &str) -> ExtractionPipeline<FixedLanguage> {
        ExtractionPipeline::with_detector(
            &DataconvConfig::default(),
            FixedLanguage(LanguageTag::new(language)),
        )
    }

    #[test]
    fn test_end_to_end_contact_card() {
        let extractor = FakeExtractor::new(&[("eng", CARD)]);
        let record = pipeline("en")
            .process(&extractor, Path::new("acme.pdf"), "chemicals")
            .unwrap();

        assert_eq!(record.company_name, "Acme Group Inc.");
        assert!(record.contact_info.contains("Tel: +1-555-0100"));
        assert_eq!(record.email, "contact@acme.com");

        let mut products = record.product_names();
        products.sort_unstable();
        assert_eq!(products, vec!["Calcium Chloride", "PVC Resin"]);

        let mut nace = record.nace_code_list();
        nace.sort_unstable();
        assert_eq!(nace, vec!["20.13", "20.16"]);

        let mut hs = record.hs_code_list();
        hs.sort_unstable();
        assert_eq!(hs, vec!["2827.20", "3904.10"]);
    }

    #[test]
    fn test_default_language_extracts_once() {
        let extractor = FakeExtractor::new(&[("eng", CARD)]);
        let run = pipeline("en")
            .run(&extractor, Path::new("acme.pdf"), "chemicals")
            .unwrap();

        assert_eq!(extractor.calls(), vec!["eng"]);
        assert!(!run.re_extracted);
        assert_eq!(run.language.as_str(), "en");
        assert_eq!(run.mode.as_str(), "eng");
    }

    #[test]
    fn test_mapped_language_re_extracts_and_discards_first_pass() {
        let extractor = FakeExtractor::new(&[
            ("eng", "Garbled Group\nPVC Resin"),
            ("tur", "Kimya Group Ltd\nCalcium Chloride"),
        ]);
        let run = pipeline("tr")
            .run(&extractor, Path::new("kimya.pdf"), "chemicals")
            .unwrap();

        assert_eq!(extractor.calls(), vec!["eng", "tur"]);
        assert!(run.re_extracted);
        assert_eq!(run.record.company_name, "Kimya Group Ltd");
        assert_eq!(run.record.products, "Calcium Chloride");
        assert_eq!(run.record.hs_codes, "2827.20");
    }

    #[test]
    fn test_unmapped_language_uses_default_mode() {
        let extractor = FakeExtractor::new(&[("eng", CARD)]);
        let run = pipeline("de")
            .run(&extractor, Path::new("acme.pdf"), "chemicals")
            .unwrap();

        assert_eq!(extractor.calls(), vec!["eng"]);
        assert_eq!(run.mode.as_str(), "eng");
    }

    #[test]
    fn test_unknown_category_yields_no_products() {
        let extractor = FakeExtractor::new(&[("eng", CARD)]);
        let record = pipeline("en")
            .process(&extractor, Path::new("acme.pdf"), "metals")
            .unwrap();

        assert_eq!(record.products, "");
        assert_eq!(record.nace_codes, "");
        assert_eq!(record.hs_codes, "");
        assert_eq!(record.email, "contact@acme.com");
    }

    #[test]
    fn test_extraction_error_propagates() {
        let err = pipeline("en")
            .process(&FailingExtractor, Path::new("missing.pdf"), "chemicals")
            .unwrap_err();
        assert!(err.to_string().contains("missing.pdf"));
    }

    #[test]
    fn test_empty_document() {
        let extractor = FakeExtractor::new(&[]);
        let record = pipeline("en")
            .process(&extractor, Path::new("blank.pdf"), "chemicals")
            .unwrap();
        assert_eq!(record, OutputRecord::default());
    }

    #[test]
    fn test_process_text_additives() {
        let record = pipeline("en").process_text(CARD, "additives");
        assert_eq!(record.products, "Sugar");
        assert_eq!(record.nace_codes, "");
    }

    #[test]
    fn test_mode_lookup() {
        let pipeline = pipeline("en");
        assert_eq!(pipeline.mode_for(&LanguageTag::new("zh")).as_str(), "chi_sim");
        assert_eq!(pipeline.mode_for(&LanguageTag::new("xx")), pipeline.default_mode());
    }
}
