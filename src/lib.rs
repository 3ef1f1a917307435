pub mod actions;
pub mod cli;
pub mod comment;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod logging;

pub use domain::Version;
pub use error::{ActionError, Result};
