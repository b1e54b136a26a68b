//! [`PageReader`] backed by JavaScript evaluated in the active Chrome tab.
//!
//! Scripts only ever return a JSON string, so `null` results survive the
//! trip through CDP's remote-object encoding.

use crate::{CdpSession, Result};
use async_trait::async_trait;
use calltally_core::{Locator, PageReader, Row};
use serde_json::Value;
use std::sync::Arc;

pub struct CdpPageReader {
    session: Arc<CdpSession>,
}

impl CdpPageReader {
    pub fn new(session: Arc<CdpSession>) -> Self {
        Self { session }
    }

    async fn evaluate_json(&self, script: String) -> Result<String> {
        let page = self.session.active_tab().await?;
        let json: String = page.evaluate(script).await?.into_value()?;
        Ok(json)
    }
}

/// `document.evaluate(...)` for the first node matching `locator`
fn first_node_expr(locator: &Locator) -> String {
    // Quoting through JSON escapes anything a locator could contain.
    let quoted = Value::String(locator.as_str().to_string()).to_string();
    format!(
        "document.evaluate({quoted}, document, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue"
    )
}

pub(crate) fn text_after_script(locator: &Locator) -> String {
    format!(
        r#"(() => {{
  const node = {node};
  const text = node?.nextSibling?.textContent?.trim() || null;
  return JSON.stringify(text);
}})()"#,
        node = first_node_expr(locator)
    )
}

pub(crate) fn table_rows_script(locator: &Locator) -> String {
    format!(
        r#"(() => {{
  const table = {node};
  if (!table) return JSON.stringify(null);
  const rows = Array.from(table.querySelectorAll('tbody tr'), (tr) =>
    Array.from(tr.querySelectorAll('td'), (td) => td.textContent.trim()));
  return JSON.stringify(rows);
}})()"#,
        node = first_node_expr(locator)
    )
}

#[async_trait]
impl PageReader for CdpPageReader {
    async fn text_after(&self, locator: &Locator) -> calltally_core::Result<Option<String>> {
        let json = self.evaluate_json(text_after_script(locator)).await?;
        let text: Option<String> = serde_json::from_str(&json)?;
        Ok(text)
    }

    async fn table_rows(&self, locator: &Locator) -> calltally_core::Result<Option<Vec<Row>>> {
        let json = self.evaluate_json(table_rows_script(locator)).await?;
        let rows: Option<Vec<Row>> = serde_json::from_str(&json)?;
        tracing::debug!(
            "Read {} rows from {}",
            rows.as_ref().map_or(0, Vec::len),
            locator
        );
        Ok(rows)
    }
}
