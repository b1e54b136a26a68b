use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Browser error: {0}")]
    Browser(String),

    #[error("CDP error: {0}")]
    Cdp(String),

    #[error("Unexpected page result: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<chromiumoxide::error::CdpError> for Error {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        Error::Cdp(err.to_string())
    }
}

// Page and window traits live in core; browser failures reach the controller
// as page/window errors.
impl From<Error> for calltally_core::Error {
    fn from(err: Error) -> Self {
        calltally_core::Error::Page(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
