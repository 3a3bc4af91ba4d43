//! Shortcut installation through menuinst.

use crate::error::Result;
use crate::platform::{self, Platform};
use crate::process::{CommandRunner, CommandSpec};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Installs and removes shortcuts described by a spec file.
#[async_trait]
pub trait ShortcutInstaller: Send + Sync {
    /// Create the shortcut described by `spec_file` for `target_prefix`.
    async fn install(&self, spec_file: &Path, target_prefix: &Path) -> Result<()>;

    /// Remove the shortcut described by `spec_file` for `target_prefix`.
    async fn remove(&self, spec_file: &Path, target_prefix: &Path) -> Result<()>;
}

/// Calls `menuinst.api` with the base environment's interpreter.
pub struct MenuinstInstaller {
    runner: Arc<dyn CommandRunner>,
    python: PathBuf,
}

impl MenuinstInstaller {
    /// Use the Python interpreter of the given base prefix.
    pub fn new(runner: Arc<dyn CommandRunner>, platform: Platform, base_prefix: &Path) -> Self {
        Self {
            runner,
            python: platform::base_python(platform, base_prefix),
        }
    }

    pub fn python(&self) -> &Path {
        &self.python
    }

    /// Build the interpreter call for a `menuinst.api` function.
    ///
    /// Paths travel through `sys.argv` so they never need quoting inside
    /// the Python source.
    pub fn api_command(
        &self,
        function: &str,
        spec_file: &Path,
        target_prefix: &Path,
    ) -> CommandSpec {
        let code = format!(
            "import sys; from menuinst.api import {function}; \
             {function}(sys.argv[1], target_prefix=sys.argv[2])"
        );

        CommandSpec::from_path(&self.python)
            .arg("-c")
            .arg(code)
            .path_arg(spec_file)
            .path_arg(target_prefix)
    }

    async fn call(&self, function: &str, spec_file: &Path, target_prefix: &Path) -> Result<()> {
        let spec = self.api_command(function, spec_file, target_prefix);
        debug!("menuinst.api.{} for {}", function, target_prefix.display());
        self.runner.run(&spec).await?.check(&spec)?;
        Ok(())
    }
}

#[async_trait]
impl ShortcutInstaller for MenuinstInstaller {
    async fn install(&self, spec_file: &Path, target_prefix: &Path) -> Result<()> {
        self.call("install", spec_file, target_prefix).await
    }

    async fn remove(&self, spec_file: &Path, target_prefix: &Path) -> Result<()> {
        self.call("remove", spec_file, target_prefix).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::JlabError;
    use crate::process::scripted::ScriptedRunner;
    use crate::process::CommandOutput;

    #[test]
    fn test_uses_base_python() {
        let runner = Arc::new(ScriptedRunner::failing());
        let unix = MenuinstInstaller::new(runner.clone(), Platform::Linux, Path::new("/opt/conda"));
        assert_eq!(unix.python(), Path::new("/opt/conda/bin/python"));

        let windows = MenuinstInstaller::new(runner, Platform::Windows, Path::new(r"C:\conda"));
        assert_eq!(windows.python(), Path::new(r"C:\conda").join("python.exe"));
    }

    #[tokio::test]
    async fn test_install_invokes_api() {
        let runner = Arc::new(ScriptedRunner::new(|_| CommandOutput::ok("")));
        let installer =
            MenuinstInstaller::new(runner.clone(), Platform::Linux, Path::new("/opt/conda"));

        installer
            .install(
                Path::new("/opt/conda/envs/lab/Menu/jupyterlab_shortcut.json"),
                Path::new("/opt/conda/envs/lab"),
            )
            .await
            .unwrap();

        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, "/opt/conda/bin/python");
        assert_eq!(calls[0].args[0], "-c");
        assert!(calls[0].args[1].contains("from menuinst.api import install"));
        assert_eq!(
            &calls[0].args[2..],
            &[
                "/opt/conda/envs/lab/Menu/jupyterlab_shortcut.json",
                "/opt/conda/envs/lab"
            ]
        );
    }

    #[tokio::test]
    async fn test_failure_is_command_error() {
        let runner = Arc::new(ScriptedRunner::new(|_| {
            CommandOutput::failed(1, "ModuleNotFoundError: No module named 'menuinst'")
        }));
        let installer = MenuinstInstaller::new(runner, Platform::Linux, Path::new("/opt/conda"));

        let err = installer
            .remove(Path::new("/tmp/spec.json"), Path::new("/tmp/env"))
            .await
            .unwrap_err();
        assert!(matches!(err, JlabError::CommandFailed { .. }));
    }
}
