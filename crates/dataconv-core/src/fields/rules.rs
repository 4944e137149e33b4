//! Ordered line classification rules.
//!
//! Every line is run through [`RULE_TABLE`] top to bottom:
//!
//! | Priority | Rule               | Group       | Fires when                                            | Effect                          |
//! |----------|--------------------|-------------|-------------------------------------------------------|---------------------------------|
//! | 1        | `ContactInfo`      | independent | line contains a contact trigger (case-insensitive)    | append trimmed line to contact  |
//! | 2        | `Email`            | exclusive   | line contains `@`                                     | record first token if unset     |
//! | 3        | `CompanyName`      | exclusive   | lowercased line contains a company marker             | overwrite company name          |
//! | 4        | `ProductCandidate` | exclusive   | not a contact line, few tokens, has a letter          | add to candidate products       |
//!
//! Independent rules are always evaluated. Among exclusive rules only the
//! first one that fires is applied, so a line containing `@` is never a
//! company name, even when the e-mail token scan finds nothing.

use super::patterns::find_email;
use crate::models::record::ClassifiedFields;

/// Whether a rule shares the exclusive slot of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleGroup {
    /// Evaluated on every line regardless of other rules.
    Independent,
    /// At most one exclusive rule is applied per line.
    Exclusive,
}

/// A single line classification rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRule {
    ContactInfo,
    Email,
    CompanyName,
    ProductCandidate,
}

/// Rules in priority order.
pub const RULE_TABLE: [(LineRule, RuleGroup); 4] = [
    (LineRule::ContactInfo, RuleGroup::Independent),
    (LineRule::Email, RuleGroup::Exclusive),
    (LineRule::CompanyName, RuleGroup::Exclusive),
    (LineRule::ProductCandidate, RuleGroup::Exclusive),
];

/// Lowercased trigger sets and thresholds the rules are evaluated against.
#[derive(Debug, Clone)]
pub struct RuleSettings {
    pub contact_triggers: Vec<String>,
    pub company_markers: Vec<String>,
    pub max_product_words: usize,
}

/// One line prepared for rule evaluation.
#[derive(Debug, Clone)]
pub struct LineContext<'a> {
    pub raw: &'a str,
    pub trimmed: &'a str,
    pub lowered: String,
    pub is_contact: bool,
}

impl<'a> LineContext<'a> {
    pub fn new(raw: &'a str, settings: &RuleSettings) -> Self {
        let lowered = raw.to_lowercase();
        let is_contact = settings
            .contact_triggers
            .iter()
            .any(|trigger| lowered.contains(trigger.as_str()));

        Self {
            raw,
            trimmed: raw.trim(),
            lowered,
            is_contact,
        }
    }
}

impl LineRule {
    pub fn group(self) -> RuleGroup {
        RULE_TABLE
            .iter()
            .find(|(rule, _)| *rule == self)
            .map(|(_, group)| *group)
            .unwrap_or(RuleGroup::Exclusive)
    }

    /// Whether the rule fires for the line.
    pub fn matches(self, line: &LineContext<'_>, settings: &RuleSettings) -> bool {
        match self {
            LineRule::ContactInfo => line.is_contact,
            LineRule::Email => line.raw.contains('@'),
            LineRule::CompanyName => settings
                .company_markers
                .iter()
                .any(|marker| line.lowered.contains(marker.as_str())),
            LineRule::ProductCandidate => {
                !line.is_contact
                    && line.raw.split_whitespace().count() <= settings.max_product_words
                    && line.raw.chars().any(char::is_alphabetic)
            }
        }
    }

    /// Record the line into the fields.
    pub fn apply(self, line: &LineContext<'_>, fields: &mut ClassifiedFields) {
        match self {
            LineRule::ContactInfo => {
                let contact = fields.contact_info.get_or_insert_with(String::new);
                contact.push_str(line.trimmed);
                contact.push('\n');
            }
            LineRule::Email => {
                if fields.email.is_none() {
                    fields.email = find_email(line.raw).map(str::to_string);
                }
            }
            LineRule::CompanyName => {
                fields.company_name = Some(line.trimmed.to_string());
            }
            LineRule::ProductCandidate => {
                fields.insert_product(line.trimmed);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> RuleSettings {
        RuleSettings {
            contact_triggers: vec!["tel".into(), "www".into(), "@".into()],
            company_markers: vec!["inc.".into(), "ltd".into()],
            max_product_words: 5,
        }
    }

    #[test]
    fn test_rule_groups() {
        assert_eq!(LineRule::ContactInfo.group(), RuleGroup::Independent);
        assert_eq!(LineRule::Email.group(), RuleGroup::Exclusive);
        assert_eq!(LineRule::ProductCandidate.group(), RuleGroup::Exclusive);
    }

    #[test]
    fn test_contact_line_is_not_a_product() {
        let settings = settings();
        let line = LineContext::new("Tel: +1-555-0100", &settings);
        assert!(LineRule::ContactInfo.matches(&line, &settings));
        assert!(!LineRule::ProductCandidate.matches(&line, &settings));
    }

    #[test]
    fn test_contact_trigger_is_case_insensitive() {
        let settings = settings();
        let line = LineContext::new("WWW.ACME.COM", &settings);
        assert!(line.is_contact);
    }

    #[test]
    fn test_email_rule_fires_without_token() {
        let settings = settings();
        let line = LineContext::new("Acme Inc. @ booth 4", &settings);
        assert!(LineRule::Email.matches(&line, &settings));

        let mut fields = ClassifiedFields::default();
        LineRule::Email.apply(&line, &mut fields);
        assert_eq!(fields.email, None);
    }

    #[test]
    fn test_product_threshold() {
        let settings = settings();
        let five = LineContext::new("one two three four five", &settings);
        let six = LineContext::new("one two three four five six", &settings);
        let numeric = LineContext::new("12 34 56", &settings);
        assert!(LineRule::ProductCandidate.matches(&five, &settings));
        assert!(!LineRule::ProductCandidate.matches(&six, &settings));
        assert!(!LineRule::ProductCandidate.matches(&numeric, &settings));
    }
}
