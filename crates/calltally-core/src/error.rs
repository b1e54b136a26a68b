use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid locator '{locator}': {reason}")]
    InvalidLocator { locator: String, reason: String },

    #[error("Invalid order numbers: {0}")]
    InvalidQuery(String),

    #[error("Page access failed: {0}")]
    Page(String),

    #[error("Session store error: {0}")]
    Session(String),

    #[error("Window error: {0}")]
    Window(String),
}

pub type Result<T> = std::result::Result<T, Error>;
