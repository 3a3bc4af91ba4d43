//! Shortcut icon assets.
//!
//! Handles:
//! - Choosing the icon format each platform's shortcuts expect
//! - Downloading the JupyterLab icon into a menu directory
//! - Converting the SVG icon to ICNS on macOS

mod icns;

pub use icns::{iconset_file_names, svg_to_icns};

use crate::config::{IconConfig, MenuFiles};
use crate::error::Result;
use crate::network::{url_file_extension, Downloader};
use crate::platform::Platform;
use crate::process::CommandRunner;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// The icon used for a platform's shortcut.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconAsset {
    /// Where the icon is downloaded from.
    pub url: &'static str,
    /// Extension of the file menuinst references, without the dot.
    pub installed_ext: &'static str,
}

impl IconAsset {
    pub fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::Windows => Self {
                url: IconConfig::WINDOWS_URL,
                installed_ext: "ico",
            },
            Platform::Linux => Self {
                url: IconConfig::LINUX_URL,
                installed_ext: "png",
            },
            Platform::MacOs => Self {
                url: IconConfig::MACOS_URL,
                installed_ext: "icns",
            },
        }
    }

    /// File name the download is saved under (extension taken from the URL).
    pub fn download_file_name(&self) -> String {
        let extension =
            url_file_extension(self.url).unwrap_or_else(|| format!(".{}", self.installed_ext));
        format!("{}{}", MenuFiles::ICON_STEM, extension)
    }

    /// File name of the icon once staged.
    pub fn installed_file_name(&self) -> String {
        format!("{}.{}", MenuFiles::ICON_STEM, self.installed_ext)
    }

    /// Whether the download has to be converted before use.
    pub fn needs_conversion(&self) -> bool {
        self.download_file_name() != self.installed_file_name()
    }
}

/// Places the platform icon into a menu directory.
pub struct IconStager {
    platform: Platform,
    downloader: Downloader,
    runner: Arc<dyn CommandRunner>,
}

impl IconStager {
    pub fn new(platform: Platform, downloader: Downloader, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            platform,
            downloader,
            runner,
        }
    }

    pub fn asset(&self) -> IconAsset {
        IconAsset::for_platform(self.platform)
    }

    /// Download (and convert if needed) the icon into `menu_dir`.
    ///
    /// # Returns
    ///
    /// Path of the icon file the shortcut spec refers to.
    pub async fn stage(&self, menu_dir: &Path) -> Result<PathBuf> {
        let asset = self.asset();
        let downloaded = menu_dir.join(asset.download_file_name());

        debug!(
            "Downloading {} to {} for use as shortcut icon",
            asset.url,
            downloaded.display()
        );
        self.downloader.download(asset.url, &downloaded).await?;

        if asset.needs_conversion() {
            svg_to_icns(self.runner.as_ref(), &downloaded).await
        } else {
            Ok(downloaded)
        }
    }
}
