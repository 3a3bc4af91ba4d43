//! menuinst shortcut specification documents.
//!
//! menuinst v2 reads a JSON document describing one or more menu items and
//! expands `{{ PLACEHOLDER }}` variables (`MENU_DIR`, `ICON_EXT`, ...) at
//! install time.

use crate::config::MenuFiles;
use crate::error::{JlabError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

const SCHEMA: &str = "https://json-schema.org/draft-07/schema";
const SCHEMA_ID: &str = "https://schemas.conda.io/menuinst-1.schema.json";

/// A menuinst shortcut document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortcutSpec {
    #[serde(rename = "$schema")]
    pub schema: String,
    #[serde(rename = "$id")]
    pub id: String,
    pub menu_name: String,
    pub menu_items: Vec<MenuItem>,
}

/// One launchable entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub name: String,
    pub description: String,
    pub command: Vec<String>,
    pub icon: String,
    /// Activate the environment before running `command`.
    pub activate: bool,
    pub terminal: bool,
    pub platforms: PlatformOptions,
}

/// Per-platform sections; a missing section disables the item there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub win: Option<WindowsOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linux: Option<LinuxOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub osx: Option<MacOsOptions>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowsOptions {
    pub desktop: bool,
    pub quicklaunch: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinuxOptions {
    #[serde(rename = "Categories")]
    pub categories: Vec<String>,
    #[serde(rename = "StartupWMClass")]
    pub startup_wm_class: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacOsOptions {
    #[serde(rename = "CFBundleName")]
    pub bundle_name: String,
    #[serde(rename = "CFBundleIdentifier")]
    pub bundle_identifier: String,
}

impl ShortcutSpec {
    /// The JupyterLab shortcut, launching `jupyter-lab` with the staged
    /// config file from the environment's menu directory.
    pub fn jupyterlab() -> Self {
        let item = MenuItem {
            name: "JupyterLab".to_string(),
            description: "Launch JupyterLab in a Chromium app window".to_string(),
            command: vec![
                "jupyter-lab".to_string(),
                format!("--config={{{{ MENU_DIR }}}}/{}", MenuFiles::LAB_CONFIG),
            ],
            icon: format!(
                "{{{{ MENU_DIR }}}}/{}.{{{{ ICON_EXT }}}}",
                MenuFiles::ICON_STEM
            ),
            activate: true,
            terminal: false,
            platforms: PlatformOptions {
                win: Some(WindowsOptions {
                    desktop: true,
                    quicklaunch: false,
                }),
                linux: Some(LinuxOptions {
                    categories: vec!["Development".to_string(), "Science".to_string()],
                    startup_wm_class: "jupyterlab".to_string(),
                }),
                osx: Some(MacOsOptions {
                    bundle_name: "JupyterLab".to_string(),
                    bundle_identifier: "org.jupyter.jupyterlab-shortcut".to_string(),
                }),
            },
        };

        Self {
            schema: SCHEMA.to_string(),
            id: SCHEMA_ID.to_string(),
            menu_name: "JupyterLab".to_string(),
            menu_items: vec![item],
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the document to `path`.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        debug!("Writing menuinst spec to {}", path.display());
        let mut json = self.to_json()?;
        json.push('\n');
        fs::write(path, json).map_err(|e| JlabError::io_with_path(e, path))
    }

    /// Read a document back from `path`.
    pub fn read_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| JlabError::io_with_path(e, path))?;
        serde_json::from_str(&contents).map_err(|e| JlabError::Json {
            message: format!("Invalid shortcut spec {}: {}", path.display(), e),
            source: Some(e),
        })
    }
}
