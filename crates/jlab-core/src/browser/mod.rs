//! Chromium-based browser detection.
//!
//! JupyterLab is launched in "app mode" (`--app=<url>`), which only
//! Chromium-based browsers support. [`BrowserResolver`] looks for one of four
//! known browsers and produces the command template JupyterLab stores in
//! `c.ServerApp.browser`, with `%s` standing in for the URL.
//!
//! Search order per platform:
//! 1. **Linux**: Flatpak applications, then executables on `PATH`
//! 2. **Windows**: the registry's default `http` handler, then Program Files
//! 3. **macOS**: application bundles in `/Applications`
//!
//! Every probe failure is a silent fallback to the next source; the
//! resolver never errors.

mod flatpak;
mod windows_default;

pub use flatpak::{parse_flatpak_apps, FlatpakProbe};
pub use windows_default::{parse_reg_default, RegistryDefaultBrowser};

use crate::config::BrowserConfig;
use crate::error::Result;
use crate::platform::{self, Platform};
use crate::process::CommandRunner;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Chromium-based browsers the resolver knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Browser {
    Chrome,
    Edge,
    Brave,
    Chromium,
}

impl Browser {
    /// Default priority order (Chrome first, being the most common).
    pub const ALL: [Browser; 4] = [
        Browser::Chrome,
        Browser::Edge,
        Browser::Brave,
        Browser::Chromium,
    ];

    /// Priority order used on a platform.
    pub fn search_order(platform: Platform) -> [Browser; 4] {
        match platform {
            Platform::Windows => [
                Browser::Chrome,
                Browser::Brave,
                Browser::Edge,
                Browser::Chromium,
            ],
            Platform::Linux | Platform::MacOs => Self::ALL,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Browser::Chrome => "Google Chrome",
            Browser::Edge => "Microsoft Edge",
            Browser::Brave => "Brave Browser",
            Browser::Chromium => "Chromium",
        }
    }

    /// Flatpak application ID.
    pub fn flatpak_id(&self) -> &'static str {
        match self {
            Browser::Chrome => "com.google.Chrome",
            Browser::Edge => "com.microsoft.Edge",
            Browser::Brave => "com.brave.Browser",
            Browser::Chromium => "org.chromium.Chromium",
        }
    }

    /// Executable location relative to a platform search root.
    ///
    /// # Platform Behavior
    /// - **Linux**: command name looked up in each `PATH` directory
    /// - **Windows**: path below `Program Files` / `Program Files (x86)`
    /// - **macOS**: path below `/Applications`, inside the app bundle
    pub fn relative_executable(&self, platform: Platform) -> &'static str {
        match (platform, self) {
            (Platform::Linux, Browser::Chrome) => "google-chrome",
            (Platform::Linux, Browser::Edge) => "microsoft-edge",
            (Platform::Linux, Browser::Brave) => "brave",
            (Platform::Linux, Browser::Chromium) => "chromium",

            (Platform::Windows, Browser::Chrome) => "Google/Chrome/Application/chrome.exe",
            (Platform::Windows, Browser::Edge) => "Microsoft/Edge/Application/msedge.exe",
            (Platform::Windows, Browser::Brave) => {
                "BraveSoftware/Brave-Browser/Application/brave.exe"
            }
            (Platform::Windows, Browser::Chromium) => "Chromium/Application/chrome.exe",

            (Platform::MacOs, Browser::Chrome) => "Google Chrome.app/Contents/MacOS/Google Chrome",
            (Platform::MacOs, Browser::Edge) => {
                "Microsoft Edge.app/Contents/MacOS/Microsoft Edge"
            }
            (Platform::MacOs, Browser::Brave) => "Brave Browser.app/Contents/MacOS/Brave Browser",
            (Platform::MacOs, Browser::Chromium) => "Chromium.app/Contents/MacOS/Chromium",
        }
    }

    /// Find the browser whose Flatpak ID is `app_id`.
    pub fn from_flatpak_id(app_id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.flatpak_id() == app_id)
    }
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Where a browser command came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserSource {
    /// Installed as a Flatpak application.
    Flatpak { app_id: String },
    /// The system's default `http` handler (Windows registry).
    RegistryDefault { executable: PathBuf },
    /// Found at a well-known install location.
    Installed { executable: PathBuf },
}

/// A browser launch command template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserCommand {
    /// Identified browser, `None` for a registry default that merely looks
    /// like a Chromium install.
    pub browser: Option<Browser>,
    /// How the browser was found.
    pub source: BrowserSource,
    template: String,
}

impl BrowserCommand {
    /// Command launching an executable directly.
    pub fn for_executable(browser: Option<Browser>, executable: &Path, from_registry: bool) -> Self {
        let template = format!(
            "\"{}\" {}",
            executable.display(),
            BrowserConfig::APP_MODE_ARGS
        );
        let executable = executable.to_path_buf();
        let source = if from_registry {
            BrowserSource::RegistryDefault { executable }
        } else {
            BrowserSource::Installed { executable }
        };

        Self {
            browser,
            source,
            template,
        }
    }

    /// Command launching a Flatpak application.
    ///
    /// The Jupyter runtime directory is shared into the sandbox so the
    /// browser can open the server's redirect file.
    pub fn for_flatpak(browser: Browser, home: &Path) -> Self {
        let runtime_dir = home.join(BrowserConfig::JUPYTER_RUNTIME_DIR);
        let template = format!(
            "flatpak run --filesystem={} {} {}",
            runtime_dir.display(),
            browser.flatpak_id(),
            BrowserConfig::APP_MODE_ARGS
        );

        Self {
            browser: Some(browser),
            source: BrowserSource::Flatpak {
                app_id: browser.flatpak_id().to_string(),
            },
            template,
        }
    }

    /// The command template with its `%s` placeholder.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Substitute a URL for the placeholder.
    pub fn render(&self, url: &str) -> String {
        self.template.replacen("%s", url, 1)
    }
}

impl fmt::Display for BrowserCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

/// Resolves the command used to open JupyterLab.
pub struct BrowserResolver {
    platform: Platform,
    runner: Arc<dyn CommandRunner>,
    /// Directories searched for browser executables.
    search_roots: Vec<PathBuf>,
    /// `PATH` entries, used to locate the flatpak binary.
    path_entries: Vec<PathBuf>,
    home_dir: PathBuf,
    consult_registry: bool,
}

impl BrowserResolver {
    /// Create a resolver with no search roots.
    pub fn new(platform: Platform, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            platform,
            runner,
            search_roots: Vec::new(),
            path_entries: Vec::new(),
            home_dir: PathBuf::new(),
            consult_registry: platform == Platform::Windows,
        }
    }

    /// Create a resolver configured from the process environment.
    ///
    /// # Platform Behavior
    /// - **Linux**: searches `PATH`
    /// - **Windows**: searches `%ProgramFiles%` and `%ProgramFiles(x86)%`
    /// - **macOS**: searches `/Applications`
    pub fn from_environment(platform: Platform, runner: Arc<dyn CommandRunner>) -> Result<Self> {
        let path_var = std::env::var("PATH").unwrap_or_default();
        let path_entries = platform::path_entries(platform, &path_var);

        let search_roots = match platform {
            Platform::Linux => path_entries.clone(),
            Platform::Windows => ["ProgramFiles", "ProgramFiles(x86)"]
                .into_iter()
                .filter_map(|var| std::env::var_os(var))
                .map(PathBuf::from)
                .collect(),
            Platform::MacOs => vec![PathBuf::from("/Applications")],
        };

        Ok(Self::new(platform, runner)
            .with_search_roots(search_roots)
            .with_path_entries(path_entries)
            .with_home_dir(platform::home_dir()?))
    }

    pub fn with_search_roots(mut self, roots: Vec<PathBuf>) -> Self {
        self.search_roots = roots;
        self
    }

    pub fn with_path_entries(mut self, entries: Vec<PathBuf>) -> Self {
        self.path_entries = entries;
        self
    }

    pub fn with_home_dir(mut self, home: impl Into<PathBuf>) -> Self {
        self.home_dir = home.into();
        self
    }

    /// Enable or disable the Windows registry lookup.
    pub fn with_registry(mut self, consult: bool) -> Self {
        self.consult_registry = consult && self.platform == Platform::Windows;
        self
    }

    /// Find a browser command, trying sandboxed and default browsers first.
    pub async fn find_browser_command(&self) -> Option<BrowserCommand> {
        if self.platform == Platform::Linux {
            let probe = FlatpakProbe::new(self.runner.clone(), self.path_entries.clone());
            if let Some(browser) = probe.find_browser().await {
                debug!("Using Flatpak browser {}", browser.flatpak_id());
                return Some(BrowserCommand::for_flatpak(browser, &self.home_dir));
            }
        }

        if self.consult_registry {
            let registry = RegistryDefaultBrowser::new(self.runner.clone());
            if let Some(command) = registry.find_browser().await {
                return Some(command);
            }
        }

        self.find_installed()
    }

    /// Search well-known install locations only.
    ///
    /// Browser priority is the outer loop, so a preferred browser anywhere
    /// in the roots beats a less preferred one in an earlier root.
    pub fn find_installed(&self) -> Option<BrowserCommand> {
        for browser in Browser::search_order(self.platform) {
            let relative = browser.relative_executable(self.platform);
            for root in &self.search_roots {
                let candidate = root.join(relative);
                if candidate.exists() {
                    debug!("Found {} at {}", browser, candidate.display());
                    return Some(BrowserCommand::for_executable(
                        Some(browser),
                        &candidate,
                        false,
                    ));
                }
            }
        }

        debug!(
            "No Chromium-based browser found in {} search roots",
            self.search_roots.len()
        );
        None
    }
}
