//! Line classification: contact info, e-mail, company name, product candidates.

mod parser;
pub mod patterns;
pub mod rules;

pub use parser::{split_lines, FieldParser};
pub use rules::{LineContext, LineRule, RuleGroup, RULE_TABLE};

pub use crate::models::record::ClassifiedFields;
