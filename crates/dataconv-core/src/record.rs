//! Assembly of the final per-document record.

use crate::models::record::{ClassifiedFields, EnrichedProduct, OutputRecord};

const LIST_SEPARATOR: &str = ", ";

/// Formats classified fields and enriched products into an [`OutputRecord`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordAssembler;

impl RecordAssembler {
    pub fn new() -> Self {
        Self
    }

    /// Pure formatting; absent fields become empty strings and empty codes are skipped.
    pub fn assemble(&self, fields: &ClassifiedFields, enriched: &[EnrichedProduct]) -> OutputRecord {
        OutputRecord {
            company_name: fields.company_name.clone().unwrap_or_default(),
            contact_info: fields.contact_info.clone().unwrap_or_default(),
            email: fields.email.clone().unwrap_or_default(),
            products: join(enriched.iter().map(|p| p.name.as_str())),
            nace_codes: join(enriched.iter().map(|p| p.nace_code.as_str())),
            hs_codes: join(enriched.iter().map(|p| p.hs_code.as_str())),
        }
    }
}

fn join<'a>(values: impl Iterator<Item = &'a str>) -> String {
    values
        .filter(|v| !v.is_empty())
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR)
}
