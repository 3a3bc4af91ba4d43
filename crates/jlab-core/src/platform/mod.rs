//! Platform abstraction layer for cross-platform compatibility.
//!
//! All OS-specific decisions go through [`Platform`]. Code elsewhere matches
//! on the variant instead of using `#[cfg]` blocks, so the Windows and macOS
//! branches run on any host.
//!
//! # Supported Platforms
//!
//! - **Linux**: browser path search, Flatpak browsers, PNG icon
//! - **Windows**: Program Files search, registry default browser, ICO icon
//! - **macOS**: `/Applications` bundles, SVG icon converted to ICNS

pub mod paths;

pub use paths::{base_python, find_in_path, home_dir, path_entries};

use crate::error::{JlabError, Result};
use std::fmt;

/// Host operating system families the tool knows how to configure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Windows,
    Linux,
    MacOs,
}

impl Platform {
    /// All supported platforms.
    pub const ALL: [Platform; 3] = [Platform::Windows, Platform::Linux, Platform::MacOs];

    /// Detect the platform this binary was compiled for.
    pub fn current() -> Result<Self> {
        Self::from_os_name(std::env::consts::OS)
    }

    /// Map a `std::env::consts::OS` style name to a platform.
    pub fn from_os_name(os: &str) -> Result<Self> {
        match os {
            "windows" => Ok(Platform::Windows),
            "linux" => Ok(Platform::Linux),
            "macos" => Ok(Platform::MacOs),
            other => Err(JlabError::UnsupportedPlatform {
                platform: other.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Windows => "windows",
            Platform::Linux => "linux",
            Platform::MacOs => "macos",
        }
    }

    /// Separator between entries of `PATH`.
    pub fn path_list_separator(&self) -> char {
        match self {
            Platform::Windows => ';',
            Platform::Linux | Platform::MacOs => ':',
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_platform() {
        #[cfg(any(target_os = "linux", target_os = "windows", target_os = "macos"))]
        assert!(Platform::current().is_ok());
    }

    #[test]
    fn test_from_os_name_roundtrip() {
        for platform in Platform::ALL {
            assert_eq!(Platform::from_os_name(platform.as_str()).unwrap(), platform);
        }
    }

    #[test]
    fn test_unsupported_platform() {
        let err = Platform::from_os_name("freebsd").unwrap_err();
        assert_eq!(err.to_string(), "freebsd is not a supported platform");
    }

    #[test]
    fn test_path_list_separator() {
        assert_eq!(Platform::Windows.path_list_separator(), ';');
        assert_eq!(Platform::Linux.path_list_separator(), ':');
    }
}
