//! File-backed text extraction: plain text, PDF text layers and OCR.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{DataconvError, OcrError, Result};
use crate::models::config::OcrConfig;
use crate::models::record::ExtractionMode;
use crate::ocr::OcrEngines;
use crate::pdf::PdfDocument;
use crate::pipeline::TextExtractor;

/// Image extensions sent straight to OCR.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tif", "tiff", "bmp", "webp"];

/// Kind of document, by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Already extracted UTF-8 text.
    Text,
    Pdf,
    Image,
}

impl DocumentKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_lowercase();
        match extension.as_str() {
            "txt" => Some(Self::Text),
            "pdf" => Some(Self::Pdf),
            ext if IMAGE_EXTENSIONS.contains(&ext) => Some(Self::Image),
            _ => None,
        }
    }
}

/// Extracts text from documents on disk.
///
/// PDFs use their text layer unless it is too short to be real content, in
/// which case embedded page images are OCR'd in the requested mode. OCR
/// engines are cached for the lifetime of the extractor.
pub struct DocumentTextExtractor {
    ocr: OcrEngines,
}

impl DocumentTextExtractor {
    pub fn new(config: OcrConfig) -> Self {
        Self {
            ocr: OcrEngines::new(config),
        }
    }

    fn extract_pdf(&self, path: &Path, mode: &ExtractionMode) -> Result<String> {
        let data = fs::read(path)?;
        let document = PdfDocument::load(&data)?;
        let text = document.text()?;

        let config = self.ocr.config();
        if !config.enabled || text.trim().chars().count() >= config.min_text_length {
            return Ok(text);
        }

        debug!(
            "{} has {} characters of text layer, trying OCR",
            path.display(),
            text.trim().len()
        );

        let mut pages = Vec::new();
        let mut failure = None;
        for (index, image) in document.images().iter().enumerate() {
            match self.ocr.recognize(image, mode) {
                Ok(page) if !page.trim().is_empty() => pages.push(page),
                Ok(_) => debug!("No text recognized in image {}", index + 1),
                Err(e @ OcrError::Recognition(_)) => {
                    warn!("OCR failed for image {} of {}: {}", index + 1, path.display(), e);
                    failure = Some(e);
                }
                // Missing models or OCR support fail every page alike.
                Err(e) => return Err(e.into()),
            }
        }

        if pages.is_empty() {
            match failure {
                Some(e) if text.trim().is_empty() => return Err(e.into()),
                _ => {
                    debug!("OCR produced nothing, keeping text layer");
                    return Ok(text);
                }
            }
        }

        Ok(pages.join("\n\n"))
    }

    fn extract_image(&self, path: &Path, mode: &ExtractionMode) -> Result<String> {
        let image = image::open(path)?;
        Ok(self.ocr.recognize(&image, mode)?)
    }
}

impl Default for DocumentTextExtractor {
    fn default() -> Self {
        Self::new(OcrConfig::default())
    }
}

impl TextExtractor for DocumentTextExtractor {
    fn extract(&self, document: &Path, mode: &ExtractionMode) -> Result<String> {
        let kind = DocumentKind::from_path(document).ok_or_else(|| {
            DataconvError::UnsupportedFormat(document.display().to_string())
        })?;

        debug!("Extracting {} as {:?} in mode {}", document.display(), kind, mode);

        match kind {
            DocumentKind::Text => Ok(fs::read_to_string(document)?),
            DocumentKind::Pdf => self.extract_pdf(document, mode),
            DocumentKind::Image => self.extract_image(document, mode),
        }
    }
}
