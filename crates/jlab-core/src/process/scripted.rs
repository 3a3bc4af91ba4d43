//! Scripted [`CommandRunner`] for unit tests.

use super::{CommandOutput, CommandRunner, CommandSpec};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Mutex;

type Responder = Box<dyn Fn(&CommandSpec) -> CommandOutput + Send + Sync>;

/// Records every command and answers through a closure.
pub(crate) struct ScriptedRunner {
    calls: Mutex<Vec<CommandSpec>>,
    respond: Responder,
}

impl ScriptedRunner {
    pub(crate) fn new<F>(respond: F) -> Self
    where
        F: Fn(&CommandSpec) -> CommandOutput + Send + Sync + 'static,
    {
        Self {
            calls: Mutex::new(Vec::new()),
            respond: Box::new(respond),
        }
    }

    /// Every command exits with status 1.
    pub(crate) fn failing() -> Self {
        Self::new(|_| CommandOutput::failed(1, "not available"))
    }

    pub(crate) fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().unwrap().clone()
    }

    /// Arguments of recorded calls whose first argument is `subcommand`.
    pub(crate) fn calls_to(&self, subcommand: &str) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter(|spec| spec.args.first().map(String::as_str) == Some(subcommand))
            .map(|spec| spec.args)
            .collect()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        self.calls.lock().unwrap().push(spec.clone());
        Ok((self.respond)(spec))
    }
}
