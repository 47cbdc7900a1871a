//! Error types for the canister helper
//!
//! Messages are printed straight to the console by the interactive session,
//! so each one names the file or canister involved.

use std::io;
use std::path::Path;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the canister helper
#[derive(Error, Debug)]
pub enum Error {
    // === Manifest Errors ===
    #[error("'{0}' file not found. Ensure it exists in the project root")]
    ManifestNotFound(String),

    #[error("Failed to parse '{path}'. Details: {reason}")]
    ManifestParse { path: String, reason: String },

    #[error("Canister '{0}' is not defined in the manifest")]
    UnknownCanister(String),

    // === Template Errors ===
    #[error("Template file '{0}' not found")]
    TemplateNotFound(String),

    #[error("Canister '{0}' requires initialization arguments but has no template file")]
    TemplateRequired(String),

    // === Script Errors ===
    #[error("Failed to start '{program}': {error}")]
    Spawn { program: String, error: String },

    #[error("Invalid canister payload: {0}")]
    InvalidPayload(String),

    // === Deployment Errors ===
    #[error("'{command}' exited with {status}")]
    CommandFailed { command: String, status: String },

    #[error("Failed to query identity principal: {0}")]
    Identity(String),

    // === Configuration Errors ===
    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    #[error("Failed to write file '{path}': {error}")]
    FileWrite { path: String, error: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a spawn error for a program that could not be started
    pub fn spawn(program: impl AsRef<Path>, error: &io::Error) -> Self {
        Self::Spawn {
            program: program.as_ref().display().to_string(),
            error: error.to_string(),
        }
    }

    /// Create a command failed error from a command line and its exit status
    pub fn command_failed(command: &str, status: &str) -> Self {
        Self::CommandFailed {
            command: command.to_string(),
            status: status.to_string(),
        }
    }

    /// Create a file read error
    pub fn file_read(path: impl AsRef<Path>, error: &io::Error) -> Self {
        Self::FileRead {
            path: path.as_ref().display().to_string(),
            error: error.to_string(),
        }
    }

    /// Create a file write error
    pub fn file_write(path: impl AsRef<Path>, error: &io::Error) -> Self {
        Self::FileWrite {
            path: path.as_ref().display().to_string(),
            error: error.to_string(),
        }
    }
}
