//! Default browser lookup through the Windows registry.
//!
//! Queries the `http` protocol handler with `reg.exe` and accepts it when the
//! handler is one of the known Chromium installs, or at least looks like one
//! (`...\Application\<name>.exe`).

use super::{Browser, BrowserCommand};
use crate::config::BrowserConfig;
use crate::platform::Platform;
use crate::process::{CommandRunner, CommandSpec};
use regex::Regex;
use std::path::PathBuf;
use std::sync::{Arc, LazyLock};
use tracing::debug;

static CHROMIUM_LAYOUT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\\Application\\\w+\.exe$").unwrap());

/// Reads the default `http` handler from the registry.
pub struct RegistryDefaultBrowser {
    runner: Arc<dyn CommandRunner>,
}

impl RegistryDefaultBrowser {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// Executable registered as the default `http` handler.
    pub async fn default_handler(&self) -> Option<String> {
        let spec = CommandSpec::new("reg").args([
            "query",
            BrowserConfig::WINDOWS_HTTP_HANDLER_KEY,
            "/ve",
        ]);

        match self.runner.run(&spec).await {
            Ok(output) if output.success() => parse_reg_default(&output.stdout),
            Ok(_) => {
                debug!("No default http handler registered");
                None
            }
            Err(e) => {
                debug!("Registry query failed: {}", e);
                None
            }
        }
    }

    /// Browser command for the default handler if it is Chromium-based.
    pub async fn find_browser(&self) -> Option<BrowserCommand> {
        let executable = self.default_handler().await?;
        debug!("Default browser command is {}", executable);

        let normalized = executable.replace('/', "\\").to_lowercase();
        let known = Browser::search_order(Platform::Windows)
            .into_iter()
            .find(|browser| {
                let relative = browser
                    .relative_executable(Platform::Windows)
                    .replace('/', "\\")
                    .to_lowercase();
                normalized.ends_with(&relative)
            });

        if known.is_some() || CHROMIUM_LAYOUT.is_match(&executable) {
            Some(BrowserCommand::for_executable(
                known,
                &PathBuf::from(executable),
                true,
            ))
        } else {
            None
        }
    }
}

/// Extract the executable from `reg query <key> /ve` output.
///
/// The default value line looks like
/// `(Default)    REG_SZ    "C:\...\chrome.exe" --single-argument %1`.
pub fn parse_reg_default(stdout: &str) -> Option<String> {
    let line = stdout.lines().find(|line| line.contains("REG_"))?;
    let (_, after_type) = line.trim().split_once("REG_")?;
    // Skip the rest of the type name (SZ, EXPAND_SZ).
    let command = after_type
        .split_once(char::is_whitespace)
        .map(|(_, rest)| rest.trim())?;

    let executable = if let Some(quoted) = command.strip_prefix('"') {
        quoted.split('"').next()?.to_string()
    } else {
        let lower = command.to_ascii_lowercase();
        match lower.find(".exe") {
            Some(idx) => command[..idx + ".exe".len()].to_string(),
            None => command.split_whitespace().next()?.to_string(),
        }
    };

    (!executable.is_empty()).then_some(executable)
}
