//! Language detection.
//!
//! Detection is advisory: a detector always yields a tag, falling back to the
//! configured default on empty, ambiguous or unrecognized text.

mod detector;

pub use detector::LinguaDetector;

pub use crate::models::record::LanguageTag;

/// Trait for language detectors.
pub trait LanguageDetector {
    /// Classify `text` into a language tag. Never fails.
    fn detect(&self, text: &str) -> LanguageTag;
}

/// Detector that always reports the same language.
///
/// Useful when the document language is known up front.
#[derive(Debug, Clone)]
pub struct FixedLanguage(pub LanguageTag);

impl LanguageDetector for FixedLanguage {
    fn detect(&self, _text: &str) -> LanguageTag {
        self.0.clone()
    }
}
