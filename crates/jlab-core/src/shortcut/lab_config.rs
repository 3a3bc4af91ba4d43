//! The `jupyter_lab_config.py` staged next to the shortcut.

use crate::browser::BrowserCommand;
use crate::error::{JlabError, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// JupyterLab configuration written into the menu directory.
///
/// Points the file browser at the user's home, launches the resolved
/// browser in app mode and finally executes the user's own
/// `~/.jupyter/jupyter_lab_config.py` so personal settings take precedence.
#[derive(Debug, Clone, Default)]
pub struct LabConfig {
    browser: Option<BrowserCommand>,
}

impl LabConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_browser(mut self, browser: Option<BrowserCommand>) -> Self {
        self.browser = browser;
        self
    }

    /// Render the Python configuration file.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("# Generated by jlab-shortcut. Re-run the tool to regenerate.\n");
        out.push_str("from pathlib import Path\n\n");
        out.push_str("c.ServerApp.root_dir = str(Path.home())\n");

        if let Some(browser) = &self.browser {
            out.push_str(&format!(
                "c.ServerApp.browser = {}\n",
                python_string_literal(browser.template())
            ));
        }

        out.push_str(
            "\n_user_config = Path.home() / \".jupyter\" / \"jupyter_lab_config.py\"\n\
             if _user_config.exists():\n    \
             exec(_user_config.read_text())\n",
        );
        out
    }

    /// Render and write the configuration to `path`.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        match &self.browser {
            Some(browser) => debug!("JupyterLab will open with: {}", browser),
            None => warn!(
                "No Chromium-based browser was found on this system, therefore Jupyter will run \
                 in a new tab of the system-default browser"
            ),
        }

        fs::write(path, self.render()).map_err(|e| JlabError::io_with_path(e, path))
    }
}

/// Quote a string as a single-quoted Python literal.
fn python_string_literal(value: &str) -> String {
    let mut literal = String::with_capacity(value.len() + 2);
    literal.push('\'');
    for c in value.chars() {
        match c {
            '\\' => literal.push_str("\\\\"),
            '\'' => literal.push_str("\\'"),
            '\n' => literal.push_str("\\n"),
            _ => literal.push(c),
        }
    }
    literal.push('\'');
    literal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::Browser;
    use std::path::PathBuf;

    #[test]
    fn test_render_without_browser() {
        let rendered = LabConfig::new().render();

        assert!(rendered.contains("c.ServerApp.root_dir = str(Path.home())"));
        assert!(!rendered.contains("c.ServerApp.browser"));
        assert!(rendered.trim_end().ends_with("exec(_user_config.read_text())"));
    }

    #[test]
    fn test_render_with_browser() {
        let browser = BrowserCommand::for_executable(
            Some(Browser::Chrome),
            &PathBuf::from("/usr/bin/google-chrome"),
            false,
        );
        let rendered = LabConfig::new().with_browser(Some(browser)).render();

        assert!(rendered.contains(
            "c.ServerApp.browser = '\"/usr/bin/google-chrome\" --start-maximized --profile-directory=Default --app=%s'"
        ));
    }

    #[test]
    fn test_browser_precedes_user_config() {
        let browser = BrowserCommand::for_flatpak(Browser::Brave, Path::new("/home/ada"));
        let rendered = LabConfig::new().with_browser(Some(browser)).render();

        let browser_at = rendered.find("c.ServerApp.browser").unwrap();
        let exec_at = rendered.find("exec(").unwrap();
        assert!(browser_at < exec_at);
    }

    #[test]
    fn test_python_string_literal_escapes() {
        assert_eq!(
            python_string_literal(r#""C:\Program Files\x.exe" it's"#),
            r#"'"C:\\Program Files\\x.exe" it\'s'"#
        );
    }
}
