//! jlab-shortcut - create or remove a JupyterLab desktop shortcut for a
//! conda environment.
//!
//! The environment is created (or topped up with the JupyterLab packages)
//! on demand, and JupyterLab opens in a Chromium app window when one of the
//! supported browsers is installed.

mod logging;

use anyhow::Result;
use clap::Parser;
use jlab_core::{JlabError, SetupOptions, ShortcutLifecycle};
use std::future::Future;
use std::process::ExitCode;
use tracing::{debug, error, info};

#[derive(Parser, Debug)]
#[command(name = "jlab-shortcut")]
#[command(about = "Create or remove a JupyterLab shortcut for a conda environment")]
struct Args {
    /// Enable debug logging to the terminal
    #[arg(long)]
    debug: bool,

    /// Remove the shortcut created by this tool and clean up the files it
    /// placed in the environment's Menu directory
    #[arg(long)]
    remove: bool,

    /// Name of the target conda environment containing JupyterLab. If it
    /// does not exist, one will be created
    name: String,
}

impl Args {
    /// Arguments replayed when the tool re-runs itself in the base
    /// environment.
    fn rerun_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if self.debug {
            args.push("--debug".to_string());
        }
        if self.remove {
            args.push("--remove".to_string());
        }
        args.push(self.name.clone());
        args
    }

    fn setup_options(&self) -> SetupOptions {
        SetupOptions::new(&self.name)
            .with_remove(self.remove)
            .with_rerun_args(self.rerun_args())
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init_logging(args.debug);

    let code = match block_on_detached(run(&args)) {
        Ok(Ok(code)) => code,
        Ok(Err(err)) => report(&err),
        Err(err) => {
            error!("Failed to start the async runtime: {}", err);
            1
        }
    };

    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

/// Drive `work` to completion on a new runtime.
///
/// The runtime is shut down without waiting on blocking tasks, so a stdin
/// read left behind by an interrupted prompt does not hold up the exit.
fn block_on_detached<F: Future>(work: F) -> std::io::Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let output = runtime.block_on(work);
    runtime.shutdown_background();
    Ok(output)
}

async fn run(args: &Args) -> Result<i32> {
    if args.remove {
        info!("Removing JupyterLab shortcut for '{}'", args.name);
    } else {
        info!("Creating JupyterLab shortcut. This may take a moment...");
    }

    let lifecycle = ShortcutLifecycle::from_system(args.setup_options())?;

    until_interrupted(lifecycle.run(), tokio::signal::ctrl_c()).await
}

/// Run `work` unless `interrupt` completes first, which cancels it.
async fn until_interrupted<W, I>(work: W, interrupt: I) -> Result<i32>
where
    W: Future<Output = jlab_core::Result<i32>>,
    I: Future<Output = std::io::Result<()>>,
{
    tokio::select! {
        result = work => Ok(result?),
        _ = interrupt => {
            debug!("Interrupt received");
            Err(JlabError::Cancelled.into())
        }
    }
}

/// Log a failure and pick the exit code for it.
fn report(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<JlabError>() {
        Some(cancelled @ JlabError::Cancelled) => info!("{}", cancelled),
        Some(failed @ JlabError::CommandFailed { output, .. }) if !output.is_empty() => {
            error!("{}:\n\n{}", failed, output);
        }
        _ => error!("{:#}", err),
    }

    err.downcast_ref::<JlabError>()
        .map_or(1, JlabError::exit_code)
}
