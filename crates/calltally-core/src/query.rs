use crate::{Error, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

lazy_static! {
    // ASCII digits only; `\d` would admit other scripts' digits.
    static ref ORDER_LIST_PATTERN: Regex = Regex::new(r"^[0-9]+(,[0-9]+)*$").unwrap();
}

/// Comma-separated order numbers entered by the user, e.g. `1001,1002`.
///
/// The first table row carrying any of these ids is where tallying starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderQuery {
    raw: String,
    ids: Vec<String>,
}

impl OrderQuery {
    pub fn parse(input: &str) -> Result<Self> {
        let raw = input.trim();
        if !is_valid(raw) {
            return Err(Error::InvalidQuery(raw.to_string()));
        }

        Ok(Self {
            raw: raw.to_string(),
            ids: raw.split(',').map(str::to_string).collect(),
        })
    }

    /// The trimmed input, as persisted between sessions
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn contains(&self, order_id: &str) -> bool {
        self.ids.iter().any(|id| id == order_id)
    }
}

impl FromStr for OrderQuery {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        OrderQuery::parse(s)
    }
}

impl fmt::Display for OrderQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Whether `input` (already trimmed) is one or more digit groups joined by commas
pub fn is_valid(input: &str) -> bool {
    ORDER_LIST_PATTERN.is_match(input)
}
