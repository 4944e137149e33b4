//! Records produced while turning document text into a contact row.

use std::fmt;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Short code identifying a detected natural language (`en`, `tr`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageTag(String);

impl LanguageTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into().trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LanguageTag {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

/// Hint handed to the text extractor, e.g. an OCR language pack (`eng`, `chi_sim`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractionMode(String);

impl ExtractionMode {
    pub fn new(mode: impl Into<String>) -> Self {
        Self(mode.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ExtractionMode {
    fn from(mode: &str) -> Self {
        Self::new(mode)
    }
}

/// Fields classified from the lines of one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedFields {
    /// Last line carrying a company marker.
    pub company_name: Option<String>,

    /// Contact lines in document order, newline-joined.
    pub contact_info: Option<String>,

    /// First e-mail address found.
    pub email: Option<String>,

    /// Short lines that may name a product. Unique, in order of first appearance.
    pub candidate_products: IndexSet<String>,
}

impl ClassifiedFields {
    /// Add a candidate product unless an identical one is already present.
    ///
    /// Returns `true` if the product was new.
    pub fn insert_product(&mut self, product: impl Into<String>) -> bool {
        self.candidate_products.insert(product.into())
    }

    /// True when nothing at all was recognized.
    pub fn is_empty(&self) -> bool {
        self.company_name.is_none()
            && self.contact_info.is_none()
            && self.email.is_none()
            && self.candidate_products.is_empty()
    }
}

/// A retained product with its classification codes.
///
/// Codes are empty strings when the product has no mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedProduct {
    pub name: String,
    pub nace_code: String,
    pub hs_code: String,
}

impl EnrichedProduct {
    pub fn new(
        name: impl Into<String>,
        nace_code: impl Into<String>,
        hs_code: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            nace_code: nace_code.into(),
            hs_code: hs_code.into(),
        }
    }

    /// Product without any known codes.
    pub fn unmapped(name: impl Into<String>) -> Self {
        Self::new(name, "", "")
    }

    pub fn is_mapped(&self) -> bool {
        !self.nace_code.is_empty() || !self.hs_code.is_empty()
    }
}

/// Final row for one document, ready for a spreadsheet or JSON exporter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputRecord {
    pub company_name: String,
    pub contact_info: String,
    pub email: String,
    /// Product names joined with `", "`.
    pub products: String,
    /// Non-empty NACE codes joined with `", "`.
    pub nace_codes: String,
    /// Non-empty HS codes joined with `", "`.
    pub hs_codes: String,
}

impl OutputRecord {
    /// Column headers used by tabular exporters, in [`OutputRecord::columns`] order.
    pub const HEADERS: [&'static str; 6] = [
        "Company Name",
        "Contact Info",
        "E-Mail",
        "Products",
        "NACE Codes",
        "HS Codes",
    ];

    /// Cell values in [`OutputRecord::HEADERS`] order.
    pub fn columns(&self) -> [&str; 6] {
        [
            &self.company_name,
            &self.contact_info,
            &self.email,
            &self.products,
            &self.nace_codes,
            &self.hs_codes,
        ]
    }

    /// Product names as a list.
    pub fn product_names(&self) -> Vec<&str> {
        split_joined(&self.products)
    }

    /// NACE codes as a list.
    pub fn nace_code_list(&self) -> Vec<&str> {
        split_joined(&self.nace_codes)
    }

    /// HS codes as a list.
    pub fn hs_code_list(&self) -> Vec<&str> {
        split_joined(&self.hs_codes)
    }
}

fn split_joined(value: &str) -> Vec<&str> {
    if value.is_empty() {
        return Vec::new();
    }
    value.split(", ").collect()
}
