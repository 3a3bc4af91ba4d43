//! Shared fakes for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use jlab_core::process::{CommandOutput, CommandRunner, CommandSpec};
use jlab_core::{Result, ShortcutInstaller};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

type Responder = Box<dyn Fn(&CommandSpec) -> CommandOutput + Send + Sync>;

/// Answers commands through a closure and records them.
pub struct FakeRunner {
    calls: Mutex<Vec<CommandSpec>>,
    respond: Responder,
}

impl FakeRunner {
    pub fn new<F>(respond: F) -> Self
    where
        F: Fn(&CommandSpec) -> CommandOutput + Send + Sync + 'static,
    {
        Self {
            calls: Mutex::new(Vec::new()),
            respond: Box::new(respond),
        }
    }

    /// Every command fails, as if no external tool were installed.
    pub fn failing() -> Self {
        Self::new(|_| CommandOutput::failed(127, "command not found"))
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().unwrap().clone()
    }

    pub fn subcommand_calls(&self, subcommand: &str) -> usize {
        self.calls()
            .iter()
            .filter(|spec| spec.args.first().map(String::as_str) == Some(subcommand))
            .count()
    }
}

#[async_trait]
impl CommandRunner for FakeRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        self.calls.lock().unwrap().push(spec.clone());
        Ok((self.respond)(spec))
    }
}

/// Records menuinst calls without touching the desktop.
#[derive(Default)]
pub struct RecordingInstaller {
    pub calls: Mutex<Vec<(String, PathBuf)>>,
}

#[async_trait]
impl ShortcutInstaller for RecordingInstaller {
    async fn install(&self, spec_file: &Path, _target_prefix: &Path) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(("install".to_string(), spec_file.to_path_buf()));
        Ok(())
    }

    async fn remove(&self, spec_file: &Path, _target_prefix: &Path) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(("remove".to_string(), spec_file.to_path_buf()));
        Ok(())
    }
}

/// Create an empty file, including parent directories.
pub fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, b"").unwrap();
}

/// Create a file with the executable bit set, as a `PATH` lookup expects.
#[cfg(unix)]
pub fn touch_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    touch(path);
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}
