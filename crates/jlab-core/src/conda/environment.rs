//! Target environment provisioning.

use crate::conda::client::Conda;
use crate::conda::listing::CondaListing;
use crate::config::EnvironmentConfig;
use crate::error::{JlabError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

impl Conda {
    /// Make sure the named environment exists and carries the JupyterLab
    /// packages, creating it if necessary.
    ///
    /// Safe to call repeatedly: an environment that already has everything
    /// is left untouched apart from its `Menu` directory being created.
    ///
    /// # Returns
    ///
    /// The environment's prefix.
    pub async fn ensure_environment(&self, env_name: &str) -> Result<PathBuf> {
        let listing = self.list_environment(env_name).await?;
        let env_prefix = self.prefixes().env_prefix(env_name);

        match &listing {
            CondaListing::Error { error } => {
                debug!("conda list reported: {}", error);
                self.create_environment(env_name, &env_prefix).await?;
            }
            CondaListing::Packages(_) => {
                let missing = listing.missing(&EnvironmentConfig::REQUIRED_PACKAGES);
                if missing.is_empty() {
                    debug!("'{}' already has the required packages", env_name);
                } else {
                    info!("Installing {} in '{}'", missing.join(" and "), env_name);
                    let spec = self
                        .command()
                        .args(["install", "--yes", "--name", env_name])
                        .args(missing)
                        .inherit_output();
                    self.run_checked(spec).await?;
                }
            }
        }

        let menu_dir = env_prefix.join(EnvironmentConfig::MENU_DIR_NAME);
        std::fs::create_dir_all(&menu_dir)
            .map_err(|e| JlabError::io_context("create menu directory", &menu_dir, e))?;

        Ok(env_prefix)
    }

    /// `conda list` for a named environment. A non-zero exit is expected
    /// when the environment does not exist.
    async fn list_environment(&self, env_name: &str) -> Result<CondaListing> {
        let spec = self.command().args(["list", "--json", "--name", env_name]);
        let output = self.runner().run(&spec).await?;

        serde_json::from_str(&output.stdout).map_err(|e| JlabError::Json {
            message: format!(
                "Error parsing conda output while checking the existence of '{}': {}",
                env_name, e
            ),
            source: Some(e),
        })
    }

    async fn create_environment(&self, env_name: &str, env_prefix: &Path) -> Result<()> {
        info!("Creating new conda environment '{}'", env_name);

        let spec = self
            .command()
            .args(["create", "--yes", "--name", env_name])
            .args(["--override-channels", "--channel", EnvironmentConfig::CHANNEL])
            .arg("--no-default-packages")
            .args(EnvironmentConfig::NEW_ENV_PACKAGES.iter().copied())
            .inherit_output();
        self.run_checked(spec).await?;

        write_condarc(env_prefix)
    }
}

/// Pin the environment to conda-forge with pip interop enabled.
fn write_condarc(env_prefix: &Path) -> Result<()> {
    std::fs::create_dir_all(env_prefix)
        .map_err(|e| JlabError::io_context("create environment prefix", env_prefix, e))?;

    let condarc = env_prefix.join(".condarc");
    let mut contents = EnvironmentConfig::CONDARC_LINES.join("\n");
    contents.push('\n');

    std::fs::write(&condarc, contents).map_err(|e| JlabError::io_with_path(e, &condarc))
}
