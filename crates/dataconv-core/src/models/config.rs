//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Main configuration for the dataconv pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataconvConfig {
    /// Language detection and extraction-mode selection.
    pub languages: LanguageConfig,

    /// Line classification rules.
    pub parsing: ParsingConfig,

    /// Category name to product keywords.
    pub categories: CategoryConfig,

    /// Product name to classification codes.
    pub codes: CodeConfig,

    /// OCR configuration.
    pub ocr: OcrConfig,
}

/// Language detection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageConfig {
    /// Tag returned when detection fails or is ambiguous.
    pub default_language: String,

    /// Extraction mode used for the first pass and for unmapped languages.
    pub default_mode: String,

    /// Detected language tag to extraction mode.
    pub modes: BTreeMap<String, String>,

    /// Minimum distance between the two most likely languages (0.0 - 0.99).
    /// Closer results are treated as ambiguous.
    pub min_relative_distance: f64,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        let modes = [
            ("en", "eng"),
            ("tr", "tur"),
            ("fr", "fra"),
            ("zh", "chi_sim"),
            ("nl", "nld"),
        ]
        .into_iter()
        .map(|(lang, mode)| (lang.to_string(), mode.to_string()))
        .collect();

        Self {
            default_language: "en".to_string(),
            default_mode: "eng".to_string(),
            modes,
            min_relative_distance: 0.0,
        }
    }
}

/// Field parser configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsingConfig {
    /// Substrings (matched case-insensitively) that mark a contact line.
    pub contact_triggers: Vec<String>,

    /// Substrings (matched case-insensitively) that mark a company-name line.
    pub company_markers: Vec<String>,

    /// Maximum whitespace-separated tokens for a product candidate line.
    pub max_product_words: usize,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            contact_triggers: to_strings(&["tel", "adres", "www", "http", "@"]),
            company_markers: to_strings(&["group", "company", "co.", "inc.", "ltd"]),
            max_product_words: 5,
        }
    }
}

/// Product category keywords.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryConfig(pub BTreeMap<String, Vec<String>>);

impl Default for CategoryConfig {
    fn default() -> Self {
        let mut categories = BTreeMap::new();
        categories.insert(
            "chemicals".to_string(),
            to_strings(&["resin", "chloride", "fluoride", "acid", "soda", "carbonate"]),
        );
        categories.insert(
            "additives".to_string(),
            to_strings(&["sugar", "flavor", "preservative", "sweetener", "color"]),
        );
        Self(categories)
    }
}

/// NACE and HS codes for one product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCodes {
    pub nace: String,
    pub hs: String,
}

impl ProductCodes {
    pub fn new(nace: impl Into<String>, hs: impl Into<String>) -> Self {
        Self {
            nace: nace.into(),
            hs: hs.into(),
        }
    }
}

/// Exact product name to codes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CodeConfig(pub BTreeMap<String, ProductCodes>);

impl Default for CodeConfig {
    fn default() -> Self {
        let mut codes = BTreeMap::new();
        codes.insert("PVC Resin".to_string(), ProductCodes::new("20.16", "3904.10"));
        codes.insert(
            "Calcium Chloride".to_string(),
            ProductCodes::new("20.13", "2827.20"),
        );
        Self(codes)
    }
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Run OCR on scanned PDFs and images.
    pub enabled: bool,

    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name (shared by all modes).
    pub detection_model: String,

    /// Extraction mode to recognition model.
    pub recognition: BTreeMap<String, RecognitionModel>,

    /// Recognition model for modes without an entry in `recognition`.
    pub fallback: RecognitionModel,

    /// PDFs whose trimmed text layer is shorter than this are treated as scans.
    pub min_text_length: usize,
}

impl Default for OcrConfig {
    fn default() -> Self {
        let mut recognition = BTreeMap::new();
        recognition.insert(
            "chi_sim".to_string(),
            RecognitionModel::new("ch_rec.onnx", "ch_dict.txt"),
        );

        Self {
            enabled: true,
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition,
            fallback: RecognitionModel::new("latin_rec.onnx", "latin_dict.txt"),
            min_text_length: 50,
        }
    }
}

/// Recognition model and its character dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognitionModel {
    pub model: String,
    pub dictionary: String,
}

impl RecognitionModel {
    pub fn new(model: impl Into<String>, dictionary: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            dictionary: dictionary.into(),
        }
    }
}

impl OcrConfig {
    /// Recognition model for an extraction mode.
    pub fn recognition_for(&self, mode: &str) -> &RecognitionModel {
        self.recognition.get(mode).unwrap_or(&self.fallback)
    }
}

impl DataconvConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Get full path to a model file.
    pub fn model_path(&self, model_name: &str) -> PathBuf {
        self.ocr.model_dir.join(model_name)
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
