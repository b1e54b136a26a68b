use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One step of an absolute element path, e.g. `div[2]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub tag: String,
    /// 1-based position among same-tag element siblings. `None` matches
    /// every same-tag sibling, as in XPath.
    pub position: Option<usize>,
}

/// An absolute structural path such as `/html/body/div[2]/div/table[2]`.
///
/// Only the subset the host page needs is accepted: element names with an
/// optional positional predicate, rooted at the document. The original text
/// is kept so it can be handed verbatim to `document.evaluate` in a browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locator {
    raw: String,
    steps: Vec<Step>,
}

impl Locator {
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        let invalid = |reason: &str| Error::InvalidLocator {
            locator: raw.to_string(),
            reason: reason.to_string(),
        };

        let rest = raw
            .strip_prefix('/')
            .ok_or_else(|| invalid("must start with '/'"))?;
        if rest.is_empty() {
            return Err(invalid("no steps"));
        }

        let mut steps = Vec::new();
        for part in rest.split('/') {
            if part.is_empty() {
                return Err(invalid("empty step ('//' is not supported)"));
            }

            let (tag, position) = match part.split_once('[') {
                Some((tag, pred)) => {
                    let digits = pred
                        .strip_suffix(']')
                        .ok_or_else(|| invalid("unterminated '['"))?;
                    let position: usize = digits
                        .parse()
                        .map_err(|_| invalid("predicate must be a positive integer"))?;
                    if position == 0 {
                        return Err(invalid("positions start at 1"));
                    }
                    (tag, Some(position))
                }
                None => (part, None),
            };

            if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
                return Err(invalid("step must be an element name"));
            }

            steps.push(Step {
                tag: tag.to_ascii_lowercase(),
                position,
            });
        }

        Ok(Self {
            raw: raw.to_string(),
            steps,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl TryFrom<String> for Locator {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Locator::parse(&value)
    }
}

impl From<Locator> for String {
    fn from(locator: Locator) -> Self {
        locator.raw
    }
}
