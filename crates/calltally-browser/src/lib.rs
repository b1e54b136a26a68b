mod cdp_session;
mod chrome_finder;
mod error;
mod launcher;
mod page_reader;
mod popup_window;
mod profile;

pub use cdp_session::CdpSession;
pub use chrome_finder::ChromeFinder;
pub use error::{Error, Result};
pub use launcher::{normalize_url, ChromeLauncher};
pub use page_reader::CdpPageReader;
pub use popup_window::{CdpWindowHost, PopupWindow};
pub use profile::ProfileManager;
