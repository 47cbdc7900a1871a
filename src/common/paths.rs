//! Configuration file locations
//!
//! A project-local `canister-helper.toml` wins over the per-user one.

use std::path::{Path, PathBuf};

/// Name used for the per-user configuration directory
const APP_NAME: &str = "canister-helper";

/// File name of the project-local configuration file
pub const PROJECT_CONFIG_FILE: &str = "canister-helper.toml";

/// Get the per-user configuration directory path
///
/// Uses the directories crate for platform-appropriate locations:
/// - Linux: `~/.config/canister-helper/`
/// - macOS: `~/Library/Application Support/canister-helper/`
/// - Windows: `%APPDATA%\canister-helper\`
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the per-user configuration file
pub fn user_config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the path to the project-local configuration file
pub fn project_config_path(root: &Path) -> PathBuf {
    root.join(PROJECT_CONFIG_FILE)
}

/// Candidate configuration files in lookup order
pub fn config_candidates(root: &Path) -> Vec<PathBuf> {
    let mut candidates = vec![project_config_path(root)];
    candidates.extend(user_config_path());
    candidates
}

/// Resolve a configured path against the project root
///
/// Absolute paths are returned unchanged.
pub fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
