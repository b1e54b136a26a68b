pub mod controller;
pub mod error;
pub mod extract;
pub mod locator;
pub mod names;
pub mod page;
pub mod query;
pub mod session;
pub mod settings;
pub mod snapshot;
pub mod tally;
pub mod window;

pub use error::{Error, Result};
pub use locator::Locator;
pub use page::{PageOutcome, PageReader, Row};
