//! Common utilities shared between the interactive session and the deploy script

pub mod config;
pub mod error;
pub mod logging;
pub mod paths;

pub use config::Settings;
pub use error::{Error, Result};
