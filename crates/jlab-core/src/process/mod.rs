//! Subprocess execution.
//!
//! Every external tool (conda, flatpak, reg, qlmanage, iconutil and the
//! menuinst Python entry points) is invoked through the [`CommandRunner`]
//! trait so that higher layers can be driven by scripted runners in tests.
//!
//! # Example
//!
//! ```rust,no_run
//! use jlab_core::process::{CommandRunner, CommandSpec, SystemRunner};
//!
//! #[tokio::main]
//! async fn main() -> jlab_core::Result<()> {
//!     let runner = SystemRunner::new();
//!     let spec = CommandSpec::new("conda").args(["info", "--json"]);
//!
//!     let output = runner.run(&spec).await?.check(&spec)?;
//!     println!("{}", output.stdout);
//!
//!     Ok(())
//! }
//! ```

mod runner;
#[cfg(test)]
pub(crate) mod scripted;

pub use runner::{CommandOutput, CommandRunner, CommandSpec, SystemRunner};
