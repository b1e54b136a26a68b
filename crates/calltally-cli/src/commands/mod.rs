pub mod chrome;
pub mod completion;
pub mod config;
pub mod name;
pub mod popup;
pub mod session;
pub mod tally;
