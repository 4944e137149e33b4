//! Heuristic field parser over extracted document text.

use tracing::{debug, trace};

use super::rules::{LineContext, RuleGroup, RuleSettings, RULE_TABLE};
use crate::models::config::ParsingConfig;
use crate::models::record::ClassifiedFields;

/// Classifies document lines into contact fields and product candidates.
#[derive(Debug, Clone)]
pub struct FieldParser {
    settings: RuleSettings,
}

impl FieldParser {
    /// Create a parser with the default trigger sets.
    pub fn new() -> Self {
        Self::from_config(&ParsingConfig::default())
    }

    /// Create a parser from configuration. Triggers are matched case-insensitively.
    pub fn from_config(config: &ParsingConfig) -> Self {
        Self {
            settings: RuleSettings {
                contact_triggers: lowercase_all(&config.contact_triggers),
                company_markers: lowercase_all(&config.company_markers),
                max_product_words: config.max_product_words,
            },
        }
    }

    /// Set the maximum number of tokens on a product candidate line.
    pub fn with_max_product_words(mut self, words: usize) -> Self {
        self.settings.max_product_words = words;
        self
    }

    /// Parse text into classified fields. Total over all inputs.
    pub fn parse(&self, text: &str) -> ClassifiedFields {
        let mut fields = ClassifiedFields::default();

        for raw in split_lines(text) {
            let line = LineContext::new(raw, &self.settings);
            let mut exclusive_taken = false;

            for (rule, group) in RULE_TABLE {
                if group == RuleGroup::Exclusive && exclusive_taken {
                    continue;
                }
                if !rule.matches(&line, &self.settings) {
                    continue;
                }

                trace!("{:?} <- {:?}", rule, line.trimmed);
                rule.apply(&line, &mut fields);

                if group == RuleGroup::Exclusive {
                    exclusive_taken = true;
                }
            }
        }

        if let Some(contact) = fields.contact_info.take() {
            let contact = contact.trim();
            if !contact.is_empty() {
                fields.contact_info = Some(contact.to_string());
            }
        }

        debug!(
            "Parsed fields: company={}, contact={}, email={}, {} candidate products",
            fields.company_name.is_some(),
            fields.contact_info.is_some(),
            fields.email.is_some(),
            fields.candidate_products.len()
        );

        fields
    }
}

impl Default for FieldParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Split text into lines on every line boundary OCR output may contain,
/// including form feeds between pages.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c| {
        matches!(
            c,
            '\n' | '\r' | '\u{0b}' | '\u{0c}' | '\u{1c}' | '\u{1d}' | '\u{1e}' | '\u{85}'
                | '\u{2028}' | '\u{2029}'
        )
    })
}

fn lowercase_all(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.to_lowercase())
        .filter(|v| !v.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn products(fields: &ClassifiedFields) -> Vec<&str> {
        fields.candidate_products.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_parse_empty() {
        let fields = FieldParser::new().parse("");
        assert_eq!(fields, ClassifiedFields::default());
        assert!(fields.is_empty());
    }

    #[test]
    fn test_parse_contact_card() {
        let text = "Acme Group Inc.\nTel: +1-555-0100\ncontact@acme.com\nPVC Resin\nCalcium Chloride\nSugar";
        let fields = FieldParser::new().parse(text);

        assert_eq!(fields.company_name.as_deref(), Some("Acme Group Inc."));
        assert_eq!(
            fields.contact_info.as_deref(),
            Some("Tel: +1-555-0100\ncontact@acme.com")
        );
        assert_eq!(fields.email.as_deref(), Some("contact@acme.com"));
        assert_eq!(
            products(&fields),
            vec!["PVC Resin", "Calcium Chloride", "Sugar"]
        );
    }

    #[test]
    fn test_first_email_wins() {
        let text = "first@acme.com\nsecond@acme.com\nthird: x@y.org";
        let fields = FieldParser::new().parse(text);
        assert_eq!(fields.email.as_deref(), Some("first@acme.com"));
    }

    #[test]
    fn test_email_line_without_token_does_not_block_later_email() {
        let text = "Reach us @ the fair\nsales@acme.com";
        let fields = FieldParser::new().parse(text);
        assert_eq!(fields.email.as_deref(), Some("sales@acme.com"));
    }

    #[test]
    fn test_last_company_wins() {
        let text = "Acme Group\nSome product\nBeta Chemicals Ltd";
        let fields = FieldParser::new().parse(text);
        assert_eq!(fields.company_name.as_deref(), Some("Beta Chemicals Ltd"));
    }

    #[test]
    fn test_email_and_company_are_exclusive() {
        let text = "Acme Group Inc. info@acme.com";
        let fields = FieldParser::new().parse(text);
        assert_eq!(fields.email.as_deref(), Some("info@acme.com"));
        assert_eq!(fields.company_name, None);
        assert_eq!(fields.contact_info.as_deref(), Some("Acme Group Inc. info@acme.com"));
    }

    #[test]
    fn test_company_and_contact_on_one_line() {
        let fields = FieldParser::new().parse("Acme Group Tel: 555
PVC Resin");
        assert_eq!(fields.company_name.as_deref(), Some("Acme Group Tel: 555"));
        assert_eq!(fields.contact_info.as_deref(), Some("Acme Group Tel: 555"));
        assert_eq!(fields.email, None);
        assert_eq!(products(&fields), vec!["PVC Resin"]);
    }

    #[test]
    fn test_product_word_threshold() {
        let text = "alpha beta gamma delta epsilon\nalpha beta gamma delta epsilon zeta";
        let fields = FieldParser::new().parse(text);
        assert_eq!(products(&fields), vec!["alpha beta gamma delta epsilon"]);
    }

    #[test]
    fn test_custom_threshold() {
        let fields = FieldParser::new()
            .with_max_product_words(1)
            .parse("Soda\nSoda Ash");
        assert_eq!(products(&fields), vec!["Soda"]);
    }

    #[test]
    fn test_blank_and_numeric_lines_dropped() {
        let text = "   \n\t\n12345\n+90 (212) 555 00 00\n---";
        let fields = FieldParser::new().parse(text);
        assert!(fields.is_empty());
    }

    #[test]
    fn test_products_deduplicated_after_trim() {
        let text = "  Citric Acid \nCitric Acid\ncitric acid";
        let fields = FieldParser::new().parse(text);
        assert_eq!(products(&fields), vec!["Citric Acid", "citric acid"]);
    }

    #[test]
    fn test_contact_lines_trimmed_and_ordered() {
        let text = "  www.acme.com  \nAdres: Istanbul\n\tHTTP://acme.com.tr";
        let fields = FieldParser::new().parse(text);
        assert_eq!(
            fields.contact_info.as_deref(),
            Some("www.acme.com\nAdres: Istanbul\nHTTP://acme.com.tr")
        );
    }

    #[test]
    fn test_configured_triggers_are_case_insensitive() {
        let config = ParsingConfig {
            contact_triggers: vec!["PHONE".to_string()],
            company_markers: vec!["GmbH".to_string()],
            max_product_words: 5,
        };
        let fields = FieldParser::from_config(&config).parse("Phone 123\nMüller gmbh");
        assert_eq!(fields.contact_info.as_deref(), Some("Phone 123"));
        assert_eq!(fields.company_name.as_deref(), Some("Müller gmbh"));
    }

    #[test]
    fn test_form_feed_and_crlf_split_lines() {
        let text = "Sodium Fluoride\r\nPage two\u{0c}Acetic Acid";
        let fields = FieldParser::new().parse(text);
        assert_eq!(
            products(&fields),
            vec!["Sodium Fluoride", "Page two", "Acetic Acid"]
        );
    }

    #[test]
    fn test_parse_never_panics_on_odd_input() {
        let parser = FieldParser::new();
        for text in ["@", "@@@\n@", "\u{0}\u{1}", "a@b@c", "şirket ltd şti.", "\u{2028}\u{2029}"] {
            let _ = parser.parse(text);
        }
    }
}
