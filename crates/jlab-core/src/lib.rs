//! jlab-core - JupyterLab desktop shortcuts for conda environments.
//!
//! This crate provides the pieces behind the `jlab-shortcut` command line
//! tool:
//! - [`browser`]: finds a Chromium-based browser to run JupyterLab in app mode
//! - [`conda`]: discovers the active conda installation and provisions the
//!   target environment
//! - [`icon`]: downloads (and on macOS converts) the shortcut icon
//! - [`shortcut`]: stages the menuinst spec and JupyterLab config and drives
//!   menuinst
//! - [`ShortcutLifecycle`]: ties it together into the create/remove flow
//!
//! # Example
//!
//! ```rust,no_run
//! use jlab_core::{SetupOptions, ShortcutLifecycle};
//!
//! #[tokio::main]
//! async fn main() -> jlab_core::Result<()> {
//!     let options = SetupOptions::new("jupyter");
//!     let lifecycle = ShortcutLifecycle::from_system(options)?;
//!
//!     let exit_code = lifecycle.run().await?;
//!     std::process::exit(exit_code);
//! }
//! ```

pub mod browser;
pub mod conda;
pub mod config;
pub mod error;
pub mod icon;
pub mod network;
pub mod platform;
pub mod process;
pub mod prompt;
pub mod shortcut;

mod lifecycle;

// Re-export commonly used types
pub use browser::{Browser, BrowserCommand, BrowserResolver, BrowserSource};
pub use conda::{Conda, CondaPrefixes};
pub use config::SetupOptions;
pub use error::{JlabError, Result};
pub use lifecycle::ShortcutLifecycle;
pub use platform::Platform;
pub use process::{CommandRunner, CommandSpec, SystemRunner};
pub use prompt::{Prompt, StdinPrompt};
pub use shortcut::{ShortcutInstaller, ShortcutManager};
