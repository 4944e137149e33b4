//! Statistical language detection backed by `lingua`.

use std::str::FromStr;

use lingua::{IsoCode639_1, Language, LanguageDetectorBuilder};
use tracing::{debug, trace};

use super::{LanguageDetector, LanguageTag};
use crate::models::config::LanguageConfig;

/// Upper bound accepted by lingua for the minimum relative distance.
const MAX_RELATIVE_DISTANCE: f64 = 0.99;

/// Language detector restricted to the languages the pipeline has modes for.
pub struct LinguaDetector {
    detector: lingua::LanguageDetector,
    fallback: LanguageTag,
}

impl LinguaDetector {
    /// Build a detector for the languages named in the configuration.
    ///
    /// Tags that lingua does not know are ignored. With fewer than two known
    /// languages the detector considers every language compiled into lingua.
    pub fn from_config(config: &LanguageConfig) -> Self {
        let mut codes: Vec<IsoCode639_1> = Vec::new();
        for tag in config.modes.keys().chain(std::iter::once(&config.default_language)) {
            match IsoCode639_1::from_str(&tag.trim().to_lowercase()) {
                Ok(code) if !codes.contains(&code) => codes.push(code),
                Ok(_) => {}
                Err(_) => debug!("Language tag {:?} is not supported by the detector", tag),
            }
        }

        let mut builder = if codes.len() >= 2 {
            LanguageDetectorBuilder::from_iso_codes_639_1(&codes)
        } else {
            debug!("Fewer than two configured languages are known, detecting among all");
            LanguageDetectorBuilder::from_all_languages()
        };

        let distance = if config.min_relative_distance.is_finite() {
            config.min_relative_distance.clamp(0.0, MAX_RELATIVE_DISTANCE)
        } else {
            0.0
        };
        let detector = builder.with_minimum_relative_distance(distance).build();

        Self {
            detector,
            fallback: LanguageTag::new(&config.default_language),
        }
    }

    /// Tag returned when detection gives no answer.
    pub fn fallback(&self) -> &LanguageTag {
        &self.fallback
    }
}

impl Default for LinguaDetector {
    fn default() -> Self {
        Self::from_config(&LanguageConfig::default())
    }
}

impl LanguageDetector for LinguaDetector {
    fn detect(&self, text: &str) -> LanguageTag {
        if !text.chars().any(char::is_alphabetic) {
            trace!("No alphabetic content, using fallback language");
            return self.fallback.clone();
        }

        match self.detector.detect_language_of(text) {
            Some(language) => {
                let tag = language_tag(language);
                debug!("Detected language {} ({:?})", tag, language);
                tag
            }
            None => {
                debug!("Language detection inconclusive, using {}", self.fallback);
                self.fallback.clone()
            }
        }
    }
}

fn language_tag(language: Language) -> LanguageTag {
    LanguageTag::new(language.iso_code_639_1().to_string())
}
