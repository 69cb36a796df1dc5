//! Reading a post's declared date out of its index document

use crate::error::{MatterFixError, Result};
use chrono::{Datelike, NaiveDate};
use regex::Regex;

/// Finds `date:` values in post text.
///
/// Accepts `YYYY-MM-DD` and `YYYY/MM/DD`; the dashed form wins when both are
/// present. The match is textual over the whole document.
#[derive(Debug, Clone)]
pub struct DateExtractor {
    dashed: Regex,
    slashed: Regex,
}

impl DateExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            dashed: Regex::new(r"date:\s*(\d{4}-\d{2}-\d{2})")?,
            slashed: Regex::new(r"date:\s*(\d{4}/\d{2}/\d{2})")?,
        })
    }

    /// The declared date normalized to `YYYY-MM-DD`, unvalidated
    pub fn extract(&self, content: &str) -> Option<String> {
        if let Some(caps) = self.dashed.captures(content) {
            return Some(caps[1].to_string());
        }
        self.slashed
            .captures(content)
            .map(|caps| caps[1].replace('/', "-"))
    }
}

/// Parse a normalized `YYYY-MM-DD` string as a calendar date
pub fn parse_post_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| MatterFixError::invalid_date(value, e.to_string()))
}

/// Two-digit day-of-month directory name for `date`
pub fn day_dir_name(date: NaiveDate) -> String {
    format!("{:02}", date.day())
}
