//! The create/remove flow for one environment's shortcut.
//!
//! Before anything is touched the tool must run from the base conda
//! environment and menuinst 2 must be available there. When the tool is
//! started elsewhere it re-runs itself under the base prefix through
//! `conda run`; when menuinst is missing or too old the user is asked
//! whether to install it.

use crate::browser::BrowserResolver;
use crate::conda::{Conda, CondaPrefixes};
use crate::config::{AppConfig, EnvironmentConfig, SetupOptions};
use crate::error::{JlabError, Result};
use crate::icon::IconStager;
use crate::network::Downloader;
use crate::platform::Platform;
use crate::process::{CommandRunner, SystemRunner};
use crate::prompt::{Prompt, StdinPrompt};
use crate::shortcut::{MenuinstInstaller, ShortcutManager};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Runs the shortcut lifecycle for the options it was built with.
pub struct ShortcutLifecycle {
    options: SetupOptions,
    conda: Conda,
    manager: ShortcutManager,
    prompt: Arc<dyn Prompt>,
    /// Executable replayed by `conda run` when not in the base environment.
    current_exe: PathBuf,
}

impl ShortcutLifecycle {
    pub fn new(
        options: SetupOptions,
        conda: Conda,
        manager: ShortcutManager,
        prompt: Arc<dyn Prompt>,
    ) -> Self {
        Self {
            options,
            conda,
            manager,
            prompt,
            current_exe: PathBuf::from(AppConfig::APP_NAME),
        }
    }

    /// Wire the lifecycle to the real system: the host platform, the conda
    /// activation variables, real subprocesses and the terminal.
    pub fn from_system(options: SetupOptions) -> Result<Self> {
        let platform = Platform::current()?;
        debug!("OS is {}", platform);

        let prefixes = CondaPrefixes::from_env()?;
        let runner: Arc<dyn CommandRunner> = Arc::new(SystemRunner::new());

        let installer = Arc::new(MenuinstInstaller::new(
            runner.clone(),
            platform,
            &prefixes.base_prefix(),
        ));
        let icons = IconStager::new(platform, Downloader::new()?, runner.clone());
        let resolver = BrowserResolver::from_environment(platform, runner.clone())?;
        let manager = ShortcutManager::new(platform, installer, icons, resolver);

        let current_exe = std::env::current_exe()?;

        Ok(Self::new(
            options,
            Conda::new(runner, prefixes),
            manager,
            Arc::new(StdinPrompt),
        )
        .with_current_exe(current_exe))
    }

    pub fn with_current_exe(mut self, exe: impl Into<PathBuf>) -> Self {
        self.current_exe = exe.into();
        self
    }

    fn prefixes(&self) -> &CondaPrefixes {
        self.conda.prefixes()
    }

    /// Create or remove the shortcut.
    ///
    /// # Returns
    ///
    /// The exit code the process should finish with: 0 on success or the
    /// re-run child's exit code when the work was delegated to the base
    /// environment.
    pub async fn run(&self) -> Result<i32> {
        if !self.prefixes().in_base_env() {
            return self
                .conda
                .run_in_base(&self.current_exe, &self.options.rerun_args)
                .await;
        }

        self.ensure_menuinst().await?;

        let env_name = &self.options.env_name;
        if self.options.remove {
            let target_prefix = self.prefixes().env_prefix(env_name);
            self.remove(&target_prefix).await?;
        } else {
            let target_prefix = self.conda.ensure_environment(env_name).await?;
            self.manager.install(&target_prefix).await?;
        }

        Ok(0)
    }

    async fn remove(&self, target_prefix: &Path) -> Result<()> {
        debug!(
            "Cleaning up '{}' at {}",
            self.options.env_name,
            target_prefix.display()
        );
        self.manager.remove(target_prefix).await
    }

    /// Make sure a supported menuinst is installed in the base environment,
    /// offering to install it when it is not.
    async fn ensure_menuinst(&self) -> Result<()> {
        if self.conda.menuinst_supported().await? {
            return Ok(());
        }

        let question = format!(
            "This tool requires {}. Would you like to install it and try again?",
            EnvironmentConfig::MENUINST_REQUIREMENT
        );
        if !self.prompt.confirm(&question).await? {
            return Err(JlabError::Cancelled);
        }

        self.conda.install_menuinst().await?;

        if self.conda.menuinst_supported().await? {
            info!("{} installed", EnvironmentConfig::MENUINST_REQUIREMENT);
            Ok(())
        } else {
            Err(JlabError::Prerequisite {
                message: format!(
                    "{} is still unavailable in {} after installing it",
                    EnvironmentConfig::MENUINST_REQUIREMENT,
                    self.prefixes().base_prefix().display()
                ),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::scripted::ScriptedRunner;
    use crate::process::CommandOutput;
    use crate::shortcut::ShortcutInstaller;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use tempfile::TempDir;

    const MENUINST_2: &str = r#"[{"name": "menuinst", "version": "2.1.2"}]"#;
    const MENUINST_1: &str = r#"[{"name": "menuinst", "version": "1.4.20"}]"#;

    struct AnswerPrompt {
        answer: bool,
        asked: AtomicUsize,
    }

    #[async_trait]
    impl Prompt for AnswerPrompt {
        async fn confirm(&self, _question: &str) -> Result<bool> {
            self.asked.fetch_add(1, Ordering::SeqCst);
            Ok(self.answer)
        }
    }

    struct NoopInstaller;

    #[async_trait]
    impl ShortcutInstaller for NoopInstaller {
        async fn install(&self, _spec_file: &Path, _target_prefix: &Path) -> Result<()> {
            Ok(())
        }

        async fn remove(&self, _spec_file: &Path, _target_prefix: &Path) -> Result<()> {
            Ok(())
        }
    }

    fn lifecycle(
        temp_dir: &TempDir,
        current: &str,
        options: SetupOptions,
        runner: Arc<ScriptedRunner>,
        prompt: Arc<AnswerPrompt>,
    ) -> ShortcutLifecycle {
        let base = temp_dir.path().join("conda");
        std::fs::create_dir_all(base.join(current)).unwrap();
        let prefixes = CondaPrefixes::new(base.join(current), base.join("bin").join("conda"));

        let icons = IconStager::new(Platform::Linux, Downloader::new().unwrap(), runner.clone());
        let resolver = BrowserResolver::new(Platform::Linux, runner.clone());
        let manager =
            ShortcutManager::new(Platform::Linux, Arc::new(NoopInstaller), icons, resolver);

        ShortcutLifecycle::new(options, Conda::new(runner, prefixes), manager, prompt)
            .with_current_exe("/usr/local/bin/jlab-shortcut")
    }

    fn prompt(answer: bool) -> Arc<AnswerPrompt> {
        Arc::new(AnswerPrompt {
            answer,
            asked: AtomicUsize::new(0),
        })
    }

    #[tokio::test]
    async fn test_reruns_outside_base_env() {
        let temp_dir = TempDir::new().unwrap();
        let runner = Arc::new(ScriptedRunner::new(|_| CommandOutput::failed(4, "")));
        let options = SetupOptions::new("lab").with_rerun_args(vec!["lab".into()]);
        let lifecycle = lifecycle(&temp_dir, "envs/work", options, runner.clone(), prompt(true));

        assert_eq!(lifecycle.run().await.unwrap(), 4);

        let calls = runner.calls_to("run");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0][1], "--prefix");
        assert_eq!(calls[0][3], "--no-capture-output");
        assert_eq!(calls[0][4], "/usr/local/bin/jlab-shortcut");
        assert_eq!(calls[0][5], "lab");
    }

    #[tokio::test]
    async fn test_declined_menuinst_install_is_cancellation() {
        let temp_dir = TempDir::new().unwrap();
        let runner = Arc::new(ScriptedRunner::new(|_| CommandOutput::ok(MENUINST_1)));
        let answers = prompt(false);
        let lifecycle = lifecycle(
            &temp_dir,
            "",
            SetupOptions::new("lab"),
            runner.clone(),
            answers.clone(),
        );

        let err = lifecycle.run().await.unwrap_err();
        assert!(err.is_cancelled());
        assert_eq!(err.exit_code(), 1);
        assert_eq!(answers.asked.load(Ordering::SeqCst), 1);
        assert!(runner.calls_to("install").is_empty());
    }

    #[tokio::test]
    async fn test_accepted_menuinst_install_continues() {
        let temp_dir = TempDir::new().unwrap();
        let installed = Arc::new(AtomicBool::new(false));
        let flag = installed.clone();
        let runner = Arc::new(ScriptedRunner::new(move |spec| {
            match spec.args[0].as_str() {
                "list" if flag.load(Ordering::SeqCst) => CommandOutput::ok(MENUINST_2),
                "list" => CommandOutput::ok("[]"),
                "install" => {
                    flag.store(true, Ordering::SeqCst);
                    CommandOutput::ok("")
                }
                _ => CommandOutput::ok(""),
            }
        }));
        let options = SetupOptions::new("lab").with_remove(true);
        let lifecycle = lifecycle(&temp_dir, "", options, runner.clone(), prompt(true));

        assert_eq!(lifecycle.run().await.unwrap(), 0);
        assert_eq!(
            runner.calls_to("install")[0].last().map(String::as_str),
            Some("menuinst>=2.0.0")
        );
    }

    #[tokio::test]
    async fn test_remove_without_existing_shortcut() {
        let temp_dir = TempDir::new().unwrap();
        let runner = Arc::new(ScriptedRunner::new(|_| CommandOutput::ok(MENUINST_2)));
        let answers = prompt(true);
        let options = SetupOptions::new("never-created").with_remove(true);
        let lifecycle = lifecycle(&temp_dir, "", options, runner, answers.clone());

        assert_eq!(lifecycle.run().await.unwrap(), 0);
        assert_eq!(answers.asked.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_base_listing_surfaces_exit_code() {
        let temp_dir = TempDir::new().unwrap();
        let runner = Arc::new(ScriptedRunner::new(|_| CommandOutput::failed(2, "CondaError")));
        let lifecycle = lifecycle(&temp_dir, "", SetupOptions::new("lab"), runner, prompt(true));

        let err = lifecycle.run().await.unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
