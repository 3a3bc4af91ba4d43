//! High-level shortcut management.
//!
//! Stages the shortcut files into an environment's `Menu` directory and
//! hands them to a [`ShortcutInstaller`].

use super::lab_config::LabConfig;
use super::menuinst::ShortcutInstaller;
use super::spec::ShortcutSpec;
use crate::browser::BrowserResolver;
use crate::config::{EnvironmentConfig, MenuFiles};
use crate::error::{JlabError, Result};
use crate::icon::{IconAsset, IconStager};
use crate::platform::Platform;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Files the shortcut owns inside a menu directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuPaths {
    pub menu_dir: PathBuf,
    pub spec: PathBuf,
    pub lab_config: PathBuf,
    pub icon: PathBuf,
}

impl MenuPaths {
    pub fn new(menu_dir: &Path, platform: Platform) -> Self {
        let icon = IconAsset::for_platform(platform).installed_file_name();
        Self {
            menu_dir: menu_dir.to_path_buf(),
            spec: menu_dir.join(MenuFiles::SHORTCUT_SPEC),
            lab_config: menu_dir.join(MenuFiles::LAB_CONFIG),
            icon: menu_dir.join(icon),
        }
    }

    /// Paths for the menu directory of an environment prefix.
    pub fn for_prefix(target_prefix: &Path, platform: Platform) -> Self {
        Self::new(&target_prefix.join(EnvironmentConfig::MENU_DIR_NAME), platform)
    }
}

/// High-level shortcut manager.
pub struct ShortcutManager {
    platform: Platform,
    installer: Arc<dyn ShortcutInstaller>,
    icons: IconStager,
    resolver: BrowserResolver,
}

impl ShortcutManager {
    pub fn new(
        platform: Platform,
        installer: Arc<dyn ShortcutInstaller>,
        icons: IconStager,
        resolver: BrowserResolver,
    ) -> Self {
        Self {
            platform,
            installer,
            icons,
            resolver,
        }
    }

    pub fn menu_paths(&self, target_prefix: &Path) -> MenuPaths {
        MenuPaths::for_prefix(target_prefix, self.platform)
    }

    /// Place the icon, the JupyterLab config and the shortcut spec into
    /// `menu_dir`.
    ///
    /// # Returns
    ///
    /// Path of the shortcut spec file.
    pub async fn stage_configs(&self, menu_dir: &Path) -> Result<PathBuf> {
        debug!("The config files will be staged in {}", menu_dir.display());
        self.icons.stage(menu_dir).await?;
        self.write_configs(menu_dir).await
    }

    /// Write the JupyterLab config and the shortcut spec into `menu_dir`.
    pub async fn write_configs(&self, menu_dir: &Path) -> Result<PathBuf> {
        let paths = MenuPaths::new(menu_dir, self.platform);

        let browser = self.resolver.find_browser_command().await;
        LabConfig::new()
            .with_browser(browser)
            .write_to_file(&paths.lab_config)?;

        ShortcutSpec::jupyterlab().write_to_file(&paths.spec)?;
        Ok(paths.spec)
    }

    /// Stage files and (re)install the shortcut for an existing environment.
    pub async fn install(&self, target_prefix: &Path) -> Result<()> {
        let menu_dir = self.menu_paths(target_prefix).menu_dir;
        let spec_file = self.stage_configs(&menu_dir).await?;

        debug!("Removing old shortcut");
        if let Err(e) = self.installer.remove(&spec_file, target_prefix).await {
            debug!("No previous shortcut removed: {}", e);
        }

        debug!("Creating new shortcut");
        self.installer.install(&spec_file, target_prefix).await?;
        info!("JupyterLab shortcut created!");
        Ok(())
    }

    /// Remove the shortcut and its staged files.
    ///
    /// menuinst failures are ignored; a missing spec file is reported but
    /// is not an error, so removing a shortcut that never existed succeeds.
    pub async fn remove(&self, target_prefix: &Path) -> Result<()> {
        let paths = self.menu_paths(target_prefix);

        if paths.spec.is_file() {
            debug!("Removing JupyterLab shortcut");
            match self.installer.remove(&paths.spec, target_prefix).await {
                Ok(()) => info!("JupyterLab shortcut removed"),
                Err(e) => debug!("menuinst could not remove the shortcut: {}", e),
            }
        } else {
            error!(
                "Shortcut spec file '{}' does not exist, therefore the shortcut cannot be \
                 removed by this tool. Please delete it manually",
                paths.spec.display()
            );
        }

        if paths.menu_dir.is_dir() {
            debug!("Cleaning up menu directory {}", paths.menu_dir.display());
            for file in [&paths.lab_config, &paths.icon, &paths.spec] {
                remove_if_exists(file)?;
            }
        }

        Ok(())
    }
}

fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(JlabError::io_context("remove staged file", path, e)),
    }
}
