//! Pure Rust OCR engine wrapper using `pure-onnx-ocr`.

use std::path::Path;
use std::time::Instant;

use image::{DynamicImage, GenericImageView};
use tracing::{debug, info};

use super::{reading_order_text, OcrLine};
use crate::error::OcrError;
use crate::models::config::OcrConfig;

/// OCR engine backed by `pure-onnx-ocr` (pure Rust, no external ONNX Runtime).
pub struct PureOcrEngine {
    engine: pure_onnx_ocr::engine::OcrEngine,
    mode: String,
}

impl PureOcrEngine {
    /// Load the detection model and the recognition model configured for `mode`.
    pub fn for_mode(config: &OcrConfig, mode: &str) -> Result<Self, OcrError> {
        let recognition = config.recognition_for(mode);
        let det_path = config.model_dir.join(&config.detection_model);
        let rec_path = config.model_dir.join(&recognition.model);
        let dict_path = config.model_dir.join(&recognition.dictionary);

        for path in [&det_path, &rec_path, &dict_path] {
            require_file(path)?;
        }

        let engine = pure_onnx_ocr::engine::OcrEngineBuilder::new()
            .det_model_path(&det_path)
            .rec_model_path(&rec_path)
            .dictionary_path(&dict_path)
            .build()
            .map_err(|e| OcrError::ModelLoad(format!("pure-onnx-ocr: {}", e)))?;

        info!(
            "Loaded OCR engine for mode {} from {}",
            mode,
            config.model_dir.display()
        );

        Ok(Self {
            engine,
            mode: mode.to_string(),
        })
    }

    /// Recognize the text of an image, lines in reading order.
    pub fn extract_text(&self, image: &DynamicImage) -> Result<String, OcrError> {
        let start = Instant::now();
        let (width, height) = image.dimensions();

        let results = self
            .engine
            .run_from_image(image)
            .map_err(|e| OcrError::Recognition(format!("pure-onnx-ocr: {}", e)))?;

        let lines = results
            .iter()
            .map(|r| {
                let (left, top) = top_left(&r.bounding_box);
                OcrLine {
                    text: r.text.replace("[UNK]", " "),
                    top,
                    left,
                }
            })
            .collect::<Vec<_>>();

        debug!(
            "OCR ({}) found {} text regions in {}x{} image in {}ms",
            self.mode,
            lines.len(),
            width,
            height,
            start.elapsed().as_millis()
        );

        Ok(reading_order_text(lines))
    }
}

fn require_file(path: &Path) -> Result<(), OcrError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(OcrError::ModelLoad(format!("missing model file {}", path.display())))
    }
}

/// Smallest x and y of a detected polygon.
fn top_left(polygon: &pure_onnx_ocr::Polygon<f64>) -> (f32, f32) {
    polygon
        .exterior()
        .coords()
        .fold((f32::INFINITY, f32::INFINITY), |(x, y), c| {
            (x.min(c.x as f32), y.min(c.y as f32))
        })
}
