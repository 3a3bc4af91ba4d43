//! Conda integration.
//!
//! This module provides:
//! - Prefix discovery from the conda activation variables
//! - Parsing of `conda list --json` output
//! - Environment provisioning and menuinst installation

mod client;
mod environment;
mod listing;
mod prefix;

pub use client::Conda;
pub use listing::{menuinst_version_supported, CondaListing, PackageRecord};
pub use prefix::CondaPrefixes;
