//! Core library for turning document text into business-contact records.
//!
//! This crate provides:
//! - Language detection with a safe fallback tag
//! - Rule-based line classification (contact info, e-mail, company, products)
//! - Category keyword filtering and NACE/HS code enrichment
//! - A two-phase extraction pipeline that re-extracts text in a
//!   language-specific mode
//! - File-backed text extraction (plain text, PDF text layer, OCR)

pub mod error;
pub mod fields;
pub mod language;
pub mod models;
pub mod ocr;
pub mod pdf;
pub mod pipeline;
pub mod products;
pub mod record;
pub mod source;

pub use error::{DataconvError, OcrError, PdfError, Result};
pub use fields::FieldParser;
pub use language::{FixedLanguage, LanguageDetector, LinguaDetector};
pub use models::config::DataconvConfig;
pub use models::record::{
    ClassifiedFields, EnrichedProduct, ExtractionMode, LanguageTag, OutputRecord,
};
pub use pipeline::{ExtractionPipeline, PipelineRun, TextExtractor};
pub use products::{CodeEnricher, CodeTable, ProductFilter};
pub use record::RecordAssembler;
pub use source::{DocumentKind, DocumentTextExtractor};
