//! Desktop shortcut management.
//!
//! This module provides:
//! - The menuinst shortcut spec document
//! - The JupyterLab config file the shortcut launches with
//! - The [`ShortcutInstaller`] seam over menuinst
//! - [`ShortcutManager`], which stages files and installs or removes shortcuts

mod lab_config;
mod manager;
mod menuinst;
mod spec;

pub use lab_config::LabConfig;
pub use manager::{MenuPaths, ShortcutManager};
pub use menuinst::{MenuinstInstaller, ShortcutInstaller};
pub use spec::{
    LinuxOptions, MacOsOptions, MenuItem, PlatformOptions, ShortcutSpec, WindowsOptions,
};
