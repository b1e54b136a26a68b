use crate::{CdpSession, Error, Result};
use async_trait::async_trait;
use calltally_core::controller::{Phase, View, ViewSink};
use calltally_core::settings::WindowGeometry;
use calltally_core::window::{Activation, WindowHost, WindowId, WindowTracker};
use chromiumoxide::cdp::browser_protocol::browser::{
    Bounds, GetWindowForTargetParams, SetWindowBoundsParams, WindowState,
};
use chromiumoxide::cdp::browser_protocol::target::CreateTargetParams;
use chromiumoxide::Page;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Opens popup-style Chrome windows and remembers their pages.
pub struct CdpWindowHost {
    session: Arc<CdpSession>,
    pages: Mutex<HashMap<WindowId, Page>>,
}

impl CdpWindowHost {
    pub fn new(session: Arc<CdpSession>) -> Self {
        Self {
            session,
            pages: Mutex::new(HashMap::new()),
        }
    }

    fn page(&self, id: &WindowId) -> Option<Page> {
        self.pages.lock().ok()?.get(id).cloned()
    }

    fn forget(&self, id: &WindowId) {
        if let Ok(mut pages) = self.pages.lock() {
            pages.remove(id);
        }
    }

    async fn open(&self, geometry: &WindowGeometry) -> Result<(WindowId, Page)> {
        let params = CreateTargetParams::builder()
            .url("about:blank")
            .new_window(true)
            .width(i64::from(geometry.width))
            .height(i64::from(geometry.height))
            .build()
            .map_err(Error::Browser)?;
        let page = self.session.browser().new_page(params).await?;

        let screen_width: u32 = page.evaluate("screen.availWidth").await?.into_value()?;
        let window = page
            .execute(
                GetWindowForTargetParams::builder()
                    .target_id(page.target_id().clone())
                    .build(),
            )
            .await?;

        let bounds = Bounds::builder()
            .left(i64::from(geometry.left_for_screen(screen_width)))
            .top(0)
            .width(i64::from(geometry.width))
            .height(i64::from(geometry.height))
            .window_state(WindowState::Normal)
            .build();
        page.execute(SetWindowBoundsParams::new(window.result.window_id.clone(), bounds))
            .await?;

        let id = page.target_id().inner().clone();
        Ok((id, page))
    }
}

#[async_trait]
impl WindowHost for CdpWindowHost {
    async fn focus(&self, id: &WindowId) -> calltally_core::Result<()> {
        let page = self
            .page(id)
            .ok_or_else(|| calltally_core::Error::Window(format!("unknown window {id}")))?;

        if let Err(e) = page.bring_to_front().await {
            self.forget(id);
            return Err(calltally_core::Error::Window(e.to_string()));
        }
        Ok(())
    }

    async fn create(&self, geometry: &WindowGeometry) -> calltally_core::Result<WindowId> {
        let (id, page) = self
            .open(geometry)
            .await
            .map_err(|e| calltally_core::Error::Window(e.to_string()))?;

        if let Ok(mut pages) = self.pages.lock() {
            pages.insert(id.clone(), page);
        }
        Ok(id)
    }
}

/// The single popup window, mirroring the controller's view.
pub struct PopupWindow {
    tracker: WindowTracker<CdpWindowHost>,
    last_view: Option<View>,
}

impl PopupWindow {
    pub fn new(session: Arc<CdpSession>, geometry: WindowGeometry) -> Self {
        Self {
            tracker: WindowTracker::new(CdpWindowHost::new(session), geometry),
            last_view: None,
        }
    }

    /// Open the popup, or bring it back to the front if it is already open.
    pub async fn activate(&mut self) -> calltally_core::Result<Activation> {
        let activation = self.tracker.activate().await?;

        // A fresh window starts blank; repaint what it should be showing.
        if let (Activation::Created(_), Some(view)) = (&activation, self.last_view.clone()) {
            self.show(&view).await;
        }
        Ok(activation)
    }

    async fn show(&mut self, view: &View) {
        let Some(page) = self.tracker.tracked().and_then(|id| self.tracker.host().page(id)) else {
            return;
        };

        if let Err(e) = page.set_content(render_html(view)).await {
            tracing::warn!("Popup window is no longer available: {}", e);
            self.tracker.forget();
        }
    }
}

#[async_trait]
impl ViewSink for PopupWindow {
    async fn render(&mut self, _phase: Phase, view: &View) {
        self.last_view = Some(view.clone());
        self.show(view).await;
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Popup markup: input echo plus the status, master and tally regions
pub(crate) fn render_html(view: &View) -> String {
    let tally = escape_html(&view.tally).replace('\n', "<br>");
    format!(
        r#"<!DOCTYPE html>
<html lang="ru">
<head>
<meta charset="utf-8">
<title>calltally</title>
<style>
  body {{ font-family: sans-serif; font-size: 14px; margin: 12px; }}
  #status {{ color: #666; min-height: 1em; }}
  #orderNumber {{ font-family: monospace; }}
  section {{ margin-top: 8px; }}
</style>
</head>
<body>
<div>Номера заявок: <span id="orderNumber">{input}</span></div>
<section id="status">{status}</section>
<section id="result">{master}</section>
<section id="table-result">{tally}</section>
</body>
</html>"#,
        input = escape_html(&view.input),
        status = escape_html(&view.status),
        master = escape_html(&view.master),
        tally = tally,
    )
}
