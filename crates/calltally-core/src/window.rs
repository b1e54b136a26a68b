use crate::settings::WindowGeometry;
use crate::Result;
use async_trait::async_trait;

pub type WindowId = String;

/// Something that can show popup windows: a browser over CDP, or a fake.
#[async_trait]
pub trait WindowHost: Send + Sync {
    /// Bring an existing window to the front. Fails if it no longer exists.
    async fn focus(&self, id: &WindowId) -> Result<()>;

    async fn create(&self, geometry: &WindowGeometry) -> Result<WindowId>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    Focused(WindowId),
    Created(WindowId),
}

impl Activation {
    pub fn id(&self) -> &WindowId {
        match self {
            Activation::Focused(id) | Activation::Created(id) => id,
        }
    }
}

/// Keeps at most one popup window open.
pub struct WindowTracker<H> {
    host: H,
    geometry: WindowGeometry,
    tracked: Option<WindowId>,
}

impl<H: WindowHost> WindowTracker<H> {
    pub fn new(host: H, geometry: WindowGeometry) -> Self {
        Self {
            host,
            geometry,
            tracked: None,
        }
    }

    /// Focus the tracked window, or open a new one if there is none or the
    /// tracked one was closed behind our back.
    pub async fn activate(&mut self) -> Result<Activation> {
        if let Some(id) = self.tracked.clone() {
            match self.host.focus(&id).await {
                Ok(()) => {
                    tracing::debug!("Focused popup window {}", id);
                    return Ok(Activation::Focused(id));
                }
                Err(e) => {
                    tracing::info!("Popup window {} is gone ({}), opening a new one", id, e);
                    self.tracked = None;
                }
            }
        }

        let id = self.host.create(&self.geometry).await?;
        tracing::info!("Opened popup window {}", id);
        self.tracked = Some(id.clone());
        Ok(Activation::Created(id))
    }

    pub fn tracked(&self) -> Option<&WindowId> {
        self.tracked.as_ref()
    }

    /// Forget the tracked window without touching it.
    pub fn forget(&mut self) {
        self.tracked = None;
    }

    pub fn host(&self) -> &H {
        &self.host
    }
}
