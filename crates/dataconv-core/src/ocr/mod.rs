//! OCR of scanned pages, one recognition model per extraction mode.

#[cfg(feature = "ocr")]
mod engine;

#[cfg(feature = "ocr")]
use std::collections::HashMap;
#[cfg(feature = "ocr")]
use std::sync::{Arc, Mutex};

use image::DynamicImage;
#[cfg(feature = "ocr")]
use tracing::debug;

use crate::error::OcrError;
use crate::models::config::OcrConfig;
use crate::models::record::ExtractionMode;

#[cfg(feature = "ocr")]
pub use engine::PureOcrEngine;

/// A recognized line with the top edge of its box, used for reading order.
#[derive(Debug, Clone, PartialEq)]
pub struct OcrLine {
    pub text: String,
    pub top: f32,
    pub left: f32,
}

/// Join recognized lines in reading order (top-to-bottom, then left-to-right).
pub fn reading_order_text(mut lines: Vec<OcrLine>) -> String {
    lines.sort_by(|a, b| {
        // Boxes within 20 pixels vertically share a row.
        let row_a = (a.top / 20.0) as i32;
        let row_b = (b.top / 20.0) as i32;
        row_a
            .cmp(&row_b)
            .then(a.left.partial_cmp(&b.left).unwrap_or(std::cmp::Ordering::Equal))
    });

    lines
        .into_iter()
        .map(|l| l.text)
        .filter(|t| !t.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Lazily created OCR engines, one per extraction mode.
///
/// Engines are built on first use, reused for every later document in the
/// same mode, and released when the cache is dropped.
pub struct OcrEngines {
    config: OcrConfig,
    #[cfg(feature = "ocr")]
    engines: Mutex<HashMap<ExtractionMode, Arc<PureOcrEngine>>>,
}

impl OcrEngines {
    pub fn new(config: OcrConfig) -> Self {
        Self {
            config,
            #[cfg(feature = "ocr")]
            engines: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &OcrConfig {
        &self.config
    }

    /// Number of engines created so far.
    #[cfg(feature = "ocr")]
    pub fn loaded(&self) -> usize {
        self.engines.lock().map(|engines| engines.len()).unwrap_or(0)
    }

    #[cfg(not(feature = "ocr"))]
    pub fn loaded(&self) -> usize {
        0
    }

    /// Recognize the text of an image in the given mode.
    #[cfg(feature = "ocr")]
    pub fn recognize(&self, image: &DynamicImage, mode: &ExtractionMode) -> Result<String, OcrError> {
        let engine = self.engine(mode)?;
        engine.extract_text(image)
    }

    #[cfg(not(feature = "ocr"))]
    pub fn recognize(&self, _image: &DynamicImage, _mode: &ExtractionMode) -> Result<String, OcrError> {
        Err(OcrError::Unavailable("built without the `ocr` feature".to_string()))
    }

    #[cfg(feature = "ocr")]
    fn engine(&self, mode: &ExtractionMode) -> Result<Arc<PureOcrEngine>, OcrError> {
        if !self.config.enabled {
            return Err(OcrError::Unavailable("disabled in configuration".to_string()));
        }

        let mut engines = self
            .engines
            .lock()
            .map_err(|_| OcrError::ModelLoad("engine cache poisoned".to_string()))?;

        if let Some(engine) = engines.get(mode) {
            return Ok(Arc::clone(engine));
        }

        debug!("Loading OCR engine for mode {}", mode);
        let engine = Arc::new(PureOcrEngine::for_mode(&self.config, mode.as_str())?);
        engines.insert(mode.clone(), Arc::clone(&engine));
        Ok(engine)
    }
}
