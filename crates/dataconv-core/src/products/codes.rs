//! NACE/HS code lookup for recognized products.

use std::collections::HashMap;

use tracing::trace;

use crate::models::config::{CodeConfig, ProductCodes};
use crate::models::record::EnrichedProduct;

/// Exact product name to classification codes.
#[derive(Debug, Clone, Default)]
pub struct CodeTable {
    entries: HashMap<String, ProductCodes>,
}

impl CodeTable {
    pub fn new(config: &CodeConfig) -> Self {
        Self {
            entries: config.0.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        }
    }

    /// Codes for a product name. Case-sensitive, whole-string match.
    pub fn get(&self, name: &str) -> Option<&ProductCodes> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Attaches classification codes to product names.
#[derive(Debug, Clone, Default)]
pub struct CodeEnricher {
    table: CodeTable,
}

impl CodeEnricher {
    pub fn new(table: CodeTable) -> Self {
        Self { table }
    }

    pub fn from_config(config: &CodeConfig) -> Self {
        Self::new(CodeTable::new(config))
    }

    /// Codes for a single product, if mapped.
    pub fn lookup(&self, name: &str) -> Option<&ProductCodes> {
        self.table.get(name)
    }

    /// Enrich products in order. Unmapped products get empty codes.
    pub fn enrich<S: AsRef<str>>(&self, products: &[S]) -> Vec<EnrichedProduct> {
        products
            .iter()
            .map(|product| product.as_ref())
            .map(|name| match self.lookup(name) {
                Some(codes) => EnrichedProduct::new(name, &codes.nace, &codes.hs),
                None => {
                    trace!("No codes for product {:?}", name);
                    EnrichedProduct::unmapped(name)
                }
            })
            .collect()
    }
}
