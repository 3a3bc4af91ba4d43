//! Flatpak browser detection (Linux).

use super::Browser;
use crate::platform;
use crate::process::{CommandRunner, CommandSpec};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Looks for Chromium-based browsers installed through Flatpak.
pub struct FlatpakProbe {
    runner: Arc<dyn CommandRunner>,
    path_entries: Vec<PathBuf>,
}

impl FlatpakProbe {
    pub fn new(runner: Arc<dyn CommandRunner>, path_entries: Vec<PathBuf>) -> Self {
        Self {
            runner,
            path_entries,
        }
    }

    /// Locate the `flatpak` binary on `PATH`.
    pub fn flatpak_binary(&self) -> Option<PathBuf> {
        platform::find_in_path("flatpak", &self.path_entries)
    }

    /// Installed Flatpak application IDs, or `None` if flatpak is missing or
    /// the list command fails.
    pub async fn installed_apps(&self) -> Option<Vec<String>> {
        let Some(flatpak) = self.flatpak_binary() else {
            debug!("flatpak is not installed");
            return None;
        };

        let spec = CommandSpec::from_path(&flatpak).args(["list", "--app", "--columns=application"]);

        match self.runner.run(&spec).await {
            Ok(output) if output.success() => Some(parse_flatpak_apps(&output.stdout)),
            Ok(output) => {
                debug!(
                    "'{}' exited with {:?}: {}",
                    spec,
                    output.exit_code,
                    output.stderr.trim()
                );
                None
            }
            Err(e) => {
                debug!("Failed to list Flatpak applications: {}", e);
                None
            }
        }
    }

    /// First known browser, in priority order, that is installed.
    pub async fn find_browser(&self) -> Option<Browser> {
        let installed = self.installed_apps().await?;

        Browser::ALL
            .into_iter()
            .find(|browser| installed.iter().any(|app| app == browser.flatpak_id()))
    }
}

/// Parse `flatpak list --app --columns=application` output.
///
/// flatpak prints an "Application ID" header when attached to a terminal
/// and omits it otherwise; both forms are accepted.
pub fn parse_flatpak_apps(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !matches!(*line, "Application ID" | "Application"))
        .map(String::from)
        .collect()
}
