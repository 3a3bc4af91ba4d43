//! Platform-specific path utilities.
//!
//! This module provides functions to get platform-specific paths for:
//! - The user's home directory
//! - Entries of the `PATH` search list
//! - The Python interpreter inside a conda prefix

use super::Platform;
use crate::error::{JlabError, Result};
use std::path::{Path, PathBuf};

/// Get the current user's home directory.
pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| JlabError::Environment {
        message: "Could not determine home directory".to_string(),
    })
}

/// Split a `PATH`-style value into directories.
///
/// Empty entries are dropped rather than treated as the current directory.
pub fn path_entries(platform: Platform, raw: &str) -> Vec<PathBuf> {
    raw.split(platform.path_list_separator())
        .filter(|entry| !entry.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Find the executable `name` in the given directories, in order.
pub fn find_in_path(name: &str, entries: &[PathBuf]) -> Option<PathBuf> {
    if entries.is_empty() {
        return None;
    }
    let joined = std::env::join_paths(entries).ok()?;
    let cwd = std::env::current_dir().unwrap_or_default();
    which::which_in(name, Some(joined), cwd).ok()
}

/// Get the path to the Python executable of a conda prefix.
///
/// # Platform Behavior
/// - **Linux/macOS**: `{prefix}/bin/python`
/// - **Windows**: `{prefix}/python.exe`
pub fn base_python(platform: Platform, prefix: &Path) -> PathBuf {
    match platform {
        Platform::Windows => prefix.join("python.exe"),
        Platform::Linux | Platform::MacOs => prefix.join("bin").join("python"),
    }
}
