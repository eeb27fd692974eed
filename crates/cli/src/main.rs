// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::unwrap_used))]

//! `dd`: the release orchestrator's command-line surface. Builds and
//! quality gates are external collaborators that call into this crate's
//! sibling libraries directly; this binary only exposes the core-relevant
//! subcommands documented in §6 (`status`, `prune`).

mod color;
mod commands;
mod exit_error;
mod output;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use dd_catalog::Settings;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use exit_error::ExitError;
use output::OutputFormat;

#[derive(Debug, Parser)]
#[command(name = "dd", version, about = "Multi-host release build orchestrator", styles = color::styles())]
struct Cli {
    /// Path to a settings TOML file; defaults are resolved from STATE_DIR/
    /// CACHE_DIR/CONFIG_DIR and platform directories when absent.
    #[arg(long, global = true)]
    settings: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print a report of the last run, loaded config, signing health, and host reachability.
    Status {
        /// Re-probe every host instead of using the cached health record.
        #[arg(long)]
        refresh: bool,
        #[arg(long)]
        json: bool,
    },
    /// Run the retention engine over build-run directories.
    Prune {
        #[arg(long)]
        dry_run: bool,
        #[arg(long)]
        force: bool,
        #[arg(long)]
        max_age: Option<String>,
        #[arg(long)]
        keep_last: Option<String>,
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    let settings = match Settings::load(cli.settings.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "failed to load settings");
            return ExitCode::from(3);
        }
    };

    let result = match cli.command {
        Commands::Status { refresh, json } => {
            let format = if json { OutputFormat::Json } else { OutputFormat::Text };
            commands::status::handle(&settings, refresh, format).await
        }
        Commands::Prune { dry_run, force, max_age, keep_last, json } => {
            let format = if json { OutputFormat::Json } else { OutputFormat::Text };
            commands::prune::handle(&settings, dry_run, force, max_age.as_deref(), keep_last.as_deref(), format)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report_failure(e),
    }
}

/// `main` is the single place that turns an error into a process exit
/// code. A command that wants a specific code (§6) returns an
/// [`ExitError`] wrapped in `anyhow`; anything else is a generic failure.
fn report_failure(e: anyhow::Error) -> ExitCode {
    match e.downcast_ref::<ExitError>() {
        Some(exit_err) => {
            if !exit_err.message.is_empty() {
                tracing::error!(error = %exit_err.message, "command failed");
            }
            ExitCode::from(exit_err.code.clamp(0, 255) as u8)
        }
        None => {
            tracing::error!(error = %e, "command failed");
            ExitCode::from(1)
        }
    }
}

fn init_tracing() {
    let filter = std::env::var("LOG_LEVEL")
        .ok()
        .and_then(|v| v.parse::<i64>().ok())
        .map(level_filter_from_int)
        .map(EnvFilter::new)
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("info"));

    let ansi = color::should_colorize();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_ansi(ansi))
        .init();
}

/// Maps an integer `LOG_LEVEL` (lower is quieter) onto a tracing level
/// filter: `0` off, `1` error, `2` warn, `3` info, `4` debug, `5+` trace.
fn level_filter_from_int(level: i64) -> &'static str {
    match level {
        ..=0 => "off",
        1 => "error",
        2 => "warn",
        3 => "info",
        4 => "debug",
        _ => "trace",
    }
}
