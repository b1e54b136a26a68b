use crate::{Error, Result};
use chromiumoxide::browser::Browser;
use chromiumoxide::Page;
use futures::StreamExt;
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;

const CONNECT_ATTEMPTS: u32 = 5;
const CONNECT_RETRY_DELAY: Duration = Duration::from_millis(500);

// Tabs only become pages once the handler has attached to them.
const PAGE_WAIT_ATTEMPTS: u32 = 10;
const PAGE_WAIT_DELAY: Duration = Duration::from_millis(100);

/// A DevTools connection to a running Chrome
pub struct CdpSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
}

impl CdpSession {
    /// Connect to Chrome's remote debugging endpoint on `localhost`.
    ///
    /// Chrome may still be starting, so a few attempts are made.
    pub async fn connect(debugging_port: u16) -> Result<Self> {
        tracing::info!("CDP session: connecting to Chrome on port {}", debugging_port);

        let endpoint = format!("http://localhost:{}", debugging_port);
        let (mut browser, mut handler) = {
            let mut retries = CONNECT_ATTEMPTS;
            loop {
                tracing::debug!("Attempting CDP connection to {}...", endpoint);
                match Browser::connect(&endpoint).await {
                    Ok(result) => {
                        tracing::info!("CDP connection established");
                        break result;
                    }
                    Err(e) => {
                        retries -= 1;
                        if retries == 0 {
                            return Err(Error::Cdp(format!(
                                "Failed to connect to Chrome on port {} after {} attempts: {}",
                                debugging_port, CONNECT_ATTEMPTS, e
                            )));
                        }
                        tracing::debug!(
                            "CDP connection attempt failed, retrying... ({} left)",
                            retries
                        );
                        tokio::time::sleep(CONNECT_RETRY_DELAY).await;
                    }
                }
            }
        };

        // The handler must be polled for any command to complete.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("CDP handler event error (continuing): {}", e);
                }
            }
        });

        // Attach to the tabs that were open before we connected.
        let targets = browser.fetch_targets().await?;
        tracing::debug!("CDP: {} targets known", targets.len());

        Ok(Self {
            browser,
            handler_task,
        })
    }

    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    /// The tab the user is looking at.
    ///
    /// Prefers a visible page with a web (or file) URL; blank and internal
    /// pages, including our own popup, are never chosen.
    pub async fn active_tab(&self) -> Result<Page> {
        let mut fallback = None;

        let pages = wait_for_items(PAGE_WAIT_ATTEMPTS, PAGE_WAIT_DELAY, || async {
            self.browser.pages().await.map_err(Error::from)
        })
        .await?;

        for page in pages {
            let url = page.url().await?.unwrap_or_default();
            if !is_scrapable_url(&url) {
                tracing::debug!("Skipping tab {}", url);
                continue;
            }

            let visible: bool = page
                .evaluate("document.visibilityState === 'visible'")
                .await?
                .into_value()?;
            if visible {
                tracing::debug!("Active tab: {}", url);
                return Ok(page);
            }
            fallback.get_or_insert(page);
        }

        fallback.ok_or_else(|| Error::Browser("No open tab with a web page".to_string()))
    }
}

impl Drop for CdpSession {
    fn drop(&mut self) {
        self.handler_task.abort();
    }
}

/// Call `list` until it returns something, at most `attempts` times.
pub(crate) async fn wait_for_items<T, F, Fut>(
    attempts: u32,
    delay: Duration,
    mut list: F,
) -> Result<Vec<T>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    let mut items = Vec::new();
    for attempt in 1..=attempts {
        items = list().await?;
        if !items.is_empty() {
            break;
        }
        if attempt < attempts {
            tracing::debug!("CDP: no pages attached yet, waiting...");
            tokio::time::sleep(delay).await;
        }
    }
    Ok(items)
}

pub(crate) fn is_scrapable_url(url: &str) -> bool {
    ["http://", "https://", "file://"]
        .iter()
        .any(|scheme| url.starts_with(scheme))
}
