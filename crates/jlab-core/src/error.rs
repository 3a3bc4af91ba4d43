//! Error types for jlab-core.
//!
//! Errors fall into three groups that the command line front-end treats
//! differently: environment and prerequisite problems (fatal, descriptive),
//! subprocess failures (fatal, exit code passed through) and user
//! cancellation (exit code 1).

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for jlab-core.
#[derive(Debug, Error)]
pub enum JlabError {
    // Environment and prerequisite errors
    #[error("{message}")]
    Environment { message: String },

    #[error("Prerequisite not met: {message}")]
    Prerequisite { message: String },

    #[error("{platform} is not a supported platform")]
    UnsupportedPlatform { platform: String },

    // Subprocess errors
    #[error("'{command}' failed with exit code {exit_code}")]
    CommandFailed {
        command: String,
        exit_code: i32,
        /// Captured stdout/stderr, empty when output was not captured.
        output: String,
    },

    #[error("Failed to run '{command}': {source}")]
    CommandSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    // File system errors
    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    // Network errors
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    #[error("Download failed for {url}: {message}")]
    DownloadFailed { url: String, message: String },

    #[error("Invalid icon file {path}: {message}")]
    InvalidIcon { path: PathBuf, message: String },

    #[error("Operation cancelled by the user")]
    Cancelled,
}

/// Result type alias for jlab-core operations.
pub type Result<T> = std::result::Result<T, JlabError>;

impl From<std::io::Error> for JlabError {
    fn from(err: std::io::Error) -> Self {
        JlabError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for JlabError {
    fn from(err: serde_json::Error) -> Self {
        JlabError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<reqwest::Error> for JlabError {
    fn from(err: reqwest::Error) -> Self {
        JlabError::Network {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl JlabError {
    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        JlabError::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// Create an IO error describing the attempted operation.
    pub fn io_context(
        message: impl Into<String>,
        path: impl Into<PathBuf>,
        err: std::io::Error,
    ) -> Self {
        JlabError::Io {
            message: message.into(),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// Create an environment error.
    pub fn environment(message: impl Into<String>) -> Self {
        JlabError::Environment {
            message: message.into(),
        }
    }

    /// Process exit code the command line tool should report for this error.
    ///
    /// Failed subprocesses surface their own exit code; everything else,
    /// cancellation included, maps to 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            JlabError::CommandFailed { exit_code, .. } if *exit_code > 0 => *exit_code,
            _ => 1,
        }
    }

    /// Whether the error represents the user backing out.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, JlabError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = JlabError::CommandFailed {
            command: "conda install --yes menuinst".into(),
            exit_code: 2,
            output: String::new(),
        };
        assert_eq!(
            err.to_string(),
            "'conda install --yes menuinst' failed with exit code 2"
        );
    }

    #[test]
    fn test_exit_codes() {
        let failed = JlabError::CommandFailed {
            command: "conda".into(),
            exit_code: 42,
            output: String::new(),
        };
        assert_eq!(failed.exit_code(), 42);
        assert_eq!(JlabError::Cancelled.exit_code(), 1);
        assert_eq!(JlabError::environment("no conda").exit_code(), 1);
    }

    #[test]
    fn test_json_error_conversion() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: JlabError = parse_err.into();
        assert!(matches!(err, JlabError::Json { .. }));
        assert!(!err.is_cancelled());
    }
}
