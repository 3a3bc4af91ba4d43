//! SVG to ICNS conversion with the macOS `qlmanage` and `iconutil` tools.

use crate::config::{IconConfig, MenuFiles};
use crate::error::{JlabError, Result};
use crate::process::{CommandRunner, CommandSpec};
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// File names of an iconset, in the order they are produced.
///
/// Every size from 16 to 1024 gets an `icon_<n>x<n>.png`; sizes above 16
/// double as the `@2x` variant of half their size.
pub fn iconset_file_names() -> Vec<String> {
    let mut names = Vec::new();
    for exp in IconConfig::ICONSET_MIN_EXP..=IconConfig::ICONSET_MAX_EXP {
        let size = 1u32 << exp;
        names.push(format!("icon_{size}x{size}.png"));
        if exp > IconConfig::ICONSET_MIN_EXP {
            let half = size / 2;
            names.push(format!("icon_{half}x{half}@2x.png"));
        }
    }
    names
}

fn validate_svg(svg_file: &Path) -> Result<()> {
    let invalid = |message: &str| JlabError::InvalidIcon {
        path: svg_file.to_path_buf(),
        message: message.to_string(),
    };

    if !svg_file.exists() {
        return Err(invalid("does not exist"));
    }
    if !svg_file.is_file() {
        return Err(invalid("exists but is not a file"));
    }
    if svg_file.extension().and_then(|e| e.to_str()) != Some("svg") {
        return Err(invalid("doesn't seem to be an SVG file"));
    }
    Ok(())
}

/// Convert an SVG icon into `jupyterlab.icns` next to it.
///
/// The SVG is deleted after a successful conversion.
///
/// # Returns
///
/// Path of the generated `.icns` file.
pub async fn svg_to_icns(runner: &dyn CommandRunner, svg_file: &Path) -> Result<PathBuf> {
    validate_svg(svg_file)?;

    let target_dir = svg_file.parent().unwrap_or_else(|| Path::new("."));
    let icns_file = target_dir.join(format!("{}.icns", MenuFiles::ICON_STEM));

    debug!(
        "Converting {} to {}",
        svg_file.display(),
        icns_file.display()
    );

    let temp_dir = tempfile::TempDir::new()?;
    let iconset_dir = temp_dir
        .path()
        .join(format!("{}.iconset", MenuFiles::ICON_STEM));
    std::fs::create_dir_all(&iconset_dir)
        .map_err(|e| JlabError::io_context("create iconset directory", &iconset_dir, e))?;

    // qlmanage names its thumbnail after the input file: jupyterlab.svg.png
    let thumbnail_name = format!(
        "{}.png",
        svg_file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    );
    let thumbnail = iconset_dir.join(thumbnail_name);

    for exp in IconConfig::ICONSET_MIN_EXP..=IconConfig::ICONSET_MAX_EXP {
        let size = 1u32 << exp;
        let outfile = iconset_dir.join(format!("icon_{size}x{size}.png"));

        let spec = CommandSpec::new("qlmanage")
            .args(["-t", "-s", &size.to_string(), "-o"])
            .path_arg(&iconset_dir)
            .path_arg(svg_file);

        if let Err(e) = runner.run(&spec).await.and_then(|output| output.check(&spec)) {
            error!("Error converting SVG icon to PNG thumbnail iconset with qlmanage");
            return Err(e);
        }

        std::fs::rename(&thumbnail, &outfile)
            .map_err(|e| JlabError::io_context("rename qlmanage thumbnail", &thumbnail, e))?;

        if exp > IconConfig::ICONSET_MIN_EXP {
            let half = size / 2;
            let retina = iconset_dir.join(format!("icon_{half}x{half}@2x.png"));
            std::fs::copy(&outfile, &retina)
                .map_err(|e| JlabError::io_context("copy retina icon", &retina, e))?;
        }
    }

    let spec = CommandSpec::new("iconutil")
        .args(["-c", "icns", "-o"])
        .path_arg(&icns_file)
        .path_arg(&iconset_dir);

    if let Err(e) = runner.run(&spec).await.and_then(|output| output.check(&spec)) {
        error!(
            "Error calling iconutil to create macOS .icns file from iconset in {}",
            iconset_dir.display()
        );
        return Err(e);
    }

    std::fs::remove_file(svg_file).map_err(|e| JlabError::io_with_path(e, svg_file))?;

    Ok(icns_file)
}
