//! Product narrowing and classification-code enrichment.

mod codes;
mod filter;

pub use codes::{CodeEnricher, CodeTable};
pub use filter::ProductFilter;

pub use crate::models::record::EnrichedProduct;
