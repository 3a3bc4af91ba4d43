//! Conda prefix discovery from the activation environment variables.

use crate::config::EnvironmentConfig;
use crate::error::{JlabError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Locations of the active conda installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CondaPrefixes {
    /// Prefix of the currently activated environment.
    pub current: PathBuf,
    /// Path to the conda executable.
    pub conda_exe: PathBuf,
}

impl CondaPrefixes {
    pub fn new(current: impl Into<PathBuf>, conda_exe: impl Into<PathBuf>) -> Self {
        Self {
            current: current.into(),
            conda_exe: conda_exe.into(),
        }
    }

    /// Resolve prefixes from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var_os(key).map(PathBuf::from))
    }

    /// Resolve prefixes through an arbitrary variable lookup.
    ///
    /// `CONDA_PREFIX` and `CONDA_EXE` are preferred; the underscore-prefixed
    /// variants some shells export instead are used as fallbacks.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<PathBuf>,
    {
        let first_of = |keys: [&str; 2]| keys.iter().find_map(|key| lookup(key));

        let current = first_of(["CONDA_PREFIX", "_CONDA_PREFIX"]).ok_or_else(no_active_env)?;
        let conda_exe = first_of(["CONDA_EXE", "_CONDA_EXE"]).ok_or_else(no_active_env)?;

        let prefixes = Self::new(current, conda_exe);
        debug!("Current prefix is {}", prefixes.current.display());
        debug!("Base prefix is {}", prefixes.base_prefix().display());
        Ok(prefixes)
    }

    /// The base environment: the grandparent of the conda executable.
    pub fn base_prefix(&self) -> PathBuf {
        self.conda_exe
            .parent()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_default()
    }

    /// Prefix a named environment lives at.
    pub fn env_prefix(&self, env_name: &str) -> PathBuf {
        self.base_prefix()
            .join(EnvironmentConfig::ENVS_DIR_NAME)
            .join(env_name)
    }

    /// Menu directory of a named environment.
    pub fn menu_dir(&self, env_name: &str) -> PathBuf {
        self.env_prefix(env_name)
            .join(EnvironmentConfig::MENU_DIR_NAME)
    }

    /// Whether the current environment is the base environment.
    pub fn in_base_env(&self) -> bool {
        same_path(&self.current, &self.base_prefix())
    }
}

fn no_active_env() -> JlabError {
    JlabError::environment(
        "No active conda environment detected. Please activate your base conda environment",
    )
}

fn same_path(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
