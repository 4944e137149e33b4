//! Regex patterns for contact field extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Loose e-mail token: word characters, dots and dashes around a single '@'.
    pub static ref EMAIL_TOKEN: Regex = Regex::new(r"[\w.\-]+@[\w.\-]+").unwrap();
}

/// First e-mail-like token in a line, verbatim.
pub fn find_email(line: &str) -> Option<&str> {
    EMAIL_TOKEN.find(line).map(|m| m.as_str())
}
