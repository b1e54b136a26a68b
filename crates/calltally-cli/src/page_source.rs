use anyhow::{Context as _, Result};
use async_trait::async_trait;
use calltally_browser::{CdpPageReader, CdpSession};
use calltally_core::snapshot::HtmlSnapshot;
use calltally_core::{Locator, PageReader, Row};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Where page data is read from: a live tab or a saved file
pub enum PageSource {
    Browser(CdpPageReader),
    Snapshot(HtmlSnapshot),
}

impl PageSource {
    /// Read `html` if given, otherwise connect to Chrome on `port`.
    ///
    /// The CDP session is returned as well so callers can open windows on it.
    pub async fn open(html: Option<&Path>, port: u16) -> Result<(Self, Option<Arc<CdpSession>>)> {
        if let Some(path) = html {
            let snapshot = HtmlSnapshot::from_file(path)
                .with_context(|| format!("Could not read HTML file {}", path.display()))?;
            return Ok((PageSource::Snapshot(snapshot), None));
        }

        let session = Arc::new(connect(port).await?);
        let reader = CdpPageReader::new(Arc::clone(&session));
        Ok((PageSource::Browser(reader), Some(session)))
    }
}

async fn connect(port: u16) -> Result<CdpSession> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}")?);
    spinner.set_message(format!("Connecting to Chrome on port {}...", port));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = CdpSession::connect(port).await;
    spinner.finish_and_clear();

    result.with_context(|| {
        format!(
            "Is Chrome running with --remote-debugging-port={}? Try 'calltally chrome'.",
            port
        )
    })
}

#[async_trait]
impl PageReader for PageSource {
    async fn text_after(&self, locator: &Locator) -> calltally_core::Result<Option<String>> {
        match self {
            PageSource::Browser(reader) => reader.text_after(locator).await,
            PageSource::Snapshot(snapshot) => snapshot.text_after(locator).await,
        }
    }

    async fn table_rows(&self, locator: &Locator) -> calltally_core::Result<Option<Vec<Row>>> {
        match self {
            PageSource::Browser(reader) => reader.table_rows(locator).await,
            PageSource::Snapshot(snapshot) => snapshot.table_rows(locator).await,
        }
    }
}
