//! Keyword-based product category filter.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use tracing::{debug, warn};

use crate::models::config::CategoryConfig;

/// Retains products that mention one of a category's keywords.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Lowercased category name to lowercased keywords.
    keywords: HashMap<String, Vec<String>>,
}

impl ProductFilter {
    /// Build the keyword table. Category names differing only in case are
    /// merged into one category.
    pub fn new(categories: &CategoryConfig) -> Self {
        let mut keywords: HashMap<String, Vec<String>> = HashMap::new();

        for (category, words) in &categories.0 {
            let words = words
                .iter()
                .map(|w| w.to_lowercase())
                .filter(|w| !w.is_empty());

            match keywords.entry(category.to_lowercase()) {
                Entry::Occupied(mut existing) => {
                    warn!(
                        "Category {:?} collides with another category named {:?}, merging keywords",
                        category,
                        existing.key()
                    );
                    let merged = existing.get_mut();
                    for word in words {
                        if !merged.contains(&word) {
                            merged.push(word);
                        }
                    }
                }
                Entry::Vacant(slot) => {
                    slot.insert(words.collect());
                }
            }
        }

        Self { keywords }
    }

    /// Configured category names, sorted.
    pub fn categories(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.keywords.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Keywords for a category; empty when the category is unknown.
    pub fn keywords(&self, category: &str) -> &[String] {
        self.keywords
            .get(&category.to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Products containing at least one keyword of `category` (case-insensitive substring).
    ///
    /// An unknown category yields an empty list.
    pub fn filter<I>(&self, products: I, category: &str) -> Vec<String>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let keywords = self.keywords(category);
        if keywords.is_empty() {
            debug!("No keywords for category {:?}", category);
            return Vec::new();
        }

        let mut seen = 0usize;
        let retained: Vec<String> = products
            .into_iter()
            .inspect(|_| seen += 1)
            .filter_map(|product| {
                let product = product.as_ref();
                let lowered = product.to_lowercase();
                keywords
                    .iter()
                    .any(|kw| lowered.contains(kw.as_str()))
                    .then(|| product.to_string())
            })
            .collect();

        debug!(
            "Category {:?} retained {} of {} products",
            category,
            retained.len(),
            seen
        );

        retained
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn filter() -> ProductFilter {
        ProductFilter::new(&CategoryConfig::default())
    }

    #[test]
    fn test_filter_chemicals() {
        let products = ["PVC Resin", "Calcium Chloride", "Sugar", "CAUSTIC SODA"];
        assert_eq!(
            filter().filter(&products, "chemicals"),
            vec!["PVC Resin", "Calcium Chloride", "CAUSTIC SODA"]
        );
    }

    #[test]
    fn test_filter_additives() {
        let products = ["PVC Resin", "Brown Sugar", "Natural Flavoring"];
        assert_eq!(
            filter().filter(&products, "additives"),
            vec!["Brown Sugar", "Natural Flavoring"]
        );
    }

    #[test]
    fn test_unknown_category_is_empty() {
        let products = ["PVC Resin", "Steel Pipe"];
        assert!(filter().filter(&products, "metals").is_empty());
        assert!(filter().keywords("metals").is_empty());
    }

    #[test]
    fn test_category_lookup_ignores_case() {
        let products = ["Citric Acid"];
        assert_eq!(filter().filter(&products, "Chemicals"), vec!["Citric Acid"]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let filter = filter();
        let products = ["PVC Resin", "Sugar", "Hydrofluoric Acid", "Paper", "Soda Ash"];
        for category in ["chemicals", "additives", "metals"] {
            let once = filter.filter(&products, category);
            let twice = filter.filter(&once, category);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_categories_differing_in_case_are_merged() {
        let mut categories = CategoryConfig::default();
        categories.0.insert("Chemicals".to_string(), vec!["Resin".to_string(), "peroxide".to_string()]);

        let filter = ProductFilter::new(&categories);
        assert_eq!(filter.categories(), vec!["additives", "chemicals"]);

        let keywords = filter.keywords("chemicals");
        assert!(keywords.contains(&"peroxide".to_string()));
        assert!(keywords.contains(&"acid".to_string()));
        assert_eq!(keywords.iter().filter(|kw| kw.as_str() == "resin").count(), 1);

        let products = ["Hydrogen Peroxide", "Citric Acid", "Sugar"];
        assert_eq!(
            filter.filter(&products, "CHEMICALS"),
            vec!["Hydrogen Peroxide", "Citric Acid"]
        );
    }

    #[test]
    fn test_categories_sorted() {
        assert_eq!(filter().categories(), vec!["additives", "chemicals"]);
    }
}
