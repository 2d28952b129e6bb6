//! Fightlog CLI
//!
//! Administrative front end for the fight catalog: register fighters,
//! record fights with their rosters, and manage fight tags.

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use fightlog_core::{ErrorKind, FightlogError};
use std::path::Path;
use std::process::ExitCode;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;

use commands::Cli;

/// Initialize tracing with optional file logging.
///
/// The returned guard flushes the file writer and must outlive `main`'s work.
fn init_tracing(log_file: Option<&Path>, verbose: bool) -> Result<Option<WorkerGuard>> {
    let default_filter = if verbose {
        "fightlog=debug,fightlog_core=debug,fightlog_db=debug"
    } else {
        "fightlog=info,fightlog_core=info,fightlog_db=warn"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    let console = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let Some(path) = log_file else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(console)
            .init();
        return Ok(None);
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Log file path has no file name: {}", path.display()))?;

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(console)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .init();
    Ok(Some(guard))
}

/// Process exit code for a failed command.
fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<FightlogError>().map(FightlogError::kind) {
        Some(ErrorKind::Validation) => 2,
        Some(ErrorKind::NotFound) => 3,
        Some(ErrorKind::Conflict) => 4,
        Some(ErrorKind::Internal) | None => 1,
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let _guard = match init_tracing(cli.log_file.as_deref(), cli.verbose) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            return ExitCode::FAILURE;
        }
    };

    match cli.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let label = e
                .downcast_ref::<FightlogError>()
                .map(|fe| format!("error[{}]:", fe.kind().as_str()))
                .unwrap_or_else(|| "error:".to_string());
            eprintln!("{} {:#}", label.red().bold(), e);
            ExitCode::from(exit_code(&e))
        }
    }
}
