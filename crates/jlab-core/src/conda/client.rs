//! Invocations of the conda executable.

use crate::conda::listing::{menuinst_version_supported, CondaListing};
use crate::conda::prefix::CondaPrefixes;
use crate::config::EnvironmentConfig;
use crate::error::Result;
use crate::process::{CommandRunner, CommandSpec};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Drives conda for environment queries and package installs.
pub struct Conda {
    runner: Arc<dyn CommandRunner>,
    prefixes: CondaPrefixes,
}

impl Conda {
    pub fn new(runner: Arc<dyn CommandRunner>, prefixes: CondaPrefixes) -> Self {
        Self { runner, prefixes }
    }

    pub fn prefixes(&self) -> &CondaPrefixes {
        &self.prefixes
    }

    pub(crate) fn runner(&self) -> &dyn CommandRunner {
        self.runner.as_ref()
    }

    /// A conda command with output captured.
    pub(crate) fn command(&self) -> CommandSpec {
        CommandSpec::from_path(&self.prefixes.conda_exe)
    }

    /// Run a command and fail on a non-zero exit.
    pub(crate) async fn run_checked(&self, spec: CommandSpec) -> Result<String> {
        let output = self.runner.run(&spec).await?.check(&spec)?;
        Ok(output.stdout)
    }

    /// Installed packages of the base environment.
    pub async fn base_listing(&self) -> Result<CondaListing> {
        let spec = self
            .command()
            .arg("list")
            .arg("--prefix")
            .path_arg(&self.prefixes.base_prefix())
            .arg("--json");

        let stdout = self.run_checked(spec).await?;
        CondaListing::parse(&stdout)
    }

    /// Installed menuinst version in the base environment, if any.
    pub async fn menuinst_version(&self) -> Result<Option<String>> {
        let listing = self.base_listing().await?;
        let version = listing
            .find(EnvironmentConfig::MENUINST_PACKAGE)
            .map(|pkg| pkg.version.clone());

        match &version {
            Some(v) => debug!("menuinst=={} found", v),
            None => warn!("menuinst was not found in the base conda environment"),
        }
        Ok(version)
    }

    /// Whether a supported menuinst is installed in the base environment.
    pub async fn menuinst_supported(&self) -> Result<bool> {
        Ok(self
            .menuinst_version()
            .await?
            .is_some_and(|v| menuinst_version_supported(&v)))
    }

    /// Install the minimum supported menuinst into the base environment.
    pub async fn install_menuinst(&self) -> Result<()> {
        info!(
            "Installing {} into the base environment",
            EnvironmentConfig::MENUINST_REQUIREMENT
        );

        let spec = self
            .command()
            .arg("install")
            .arg("--yes")
            .arg("--prefix")
            .path_arg(&self.prefixes.base_prefix())
            .arg(EnvironmentConfig::MENUINST_REQUIREMENT)
            .inherit_output();

        self.run_checked(spec).await.map(|_| ())
    }

    /// Re-run an executable inside the base environment via `conda run`.
    ///
    /// # Returns
    ///
    /// The child's exit code (1 when it was killed by a signal).
    pub async fn run_in_base(&self, program: &Path, args: &[String]) -> Result<i32> {
        warn!("Not in base environment. Re-running from the base environment");

        let spec = self
            .command()
            .arg("run")
            .arg("--prefix")
            .path_arg(&self.prefixes.base_prefix())
            .arg("--no-capture-output")
            .path_arg(program)
            .args(args.iter().cloned())
            .inherit_output();

        let output = self.runner.run(&spec).await?;
        Ok(output.exit_code.unwrap_or(1))
    }
}
