//! Read-only access to the host page.
//!
//! A [`PageReader`] evaluates a locator somewhere the DOM lives (a browser tab
//! over CDP, or a saved HTML snapshot) and hands back plain data. Nothing that
//! crosses this boundary is a live node.

use crate::locator::Locator;
use crate::Result;
use async_trait::async_trait;

/// Trimmed text of each `td` in a table row, in document order.
pub type Row = Vec<String>;

#[async_trait]
pub trait PageReader: Send + Sync {
    /// Text of the node immediately following the first match of `locator`.
    ///
    /// `Ok(None)` when nothing matches, there is no following sibling, or its
    /// trimmed text is empty.
    async fn text_after(&self, locator: &Locator) -> Result<Option<String>>;

    /// Cells of every `tbody tr` under the table at `locator`.
    ///
    /// `Ok(None)` when the table itself is absent.
    async fn table_rows(&self, locator: &Locator) -> Result<Option<Vec<Row>>>;
}

/// Three-way result of asking the page for something.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome<T> {
    Found(T),
    NotFound,
    Failed(String),
}

impl<T> PageOutcome<T> {
    pub fn found(self) -> Option<T> {
        match self {
            PageOutcome::Found(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> PageOutcome<U> {
        match self {
            PageOutcome::Found(value) => PageOutcome::Found(f(value)),
            PageOutcome::NotFound => PageOutcome::NotFound,
            PageOutcome::Failed(reason) => PageOutcome::Failed(reason),
        }
    }
}

impl<T> From<Result<Option<T>>> for PageOutcome<T> {
    fn from(result: Result<Option<T>>) -> Self {
        match result {
            Ok(Some(value)) => PageOutcome::Found(value),
            Ok(None) => PageOutcome::NotFound,
            Err(e) => PageOutcome::Failed(e.to_string()),
        }
    }
}
