// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `prune [--dry-run] [--force] [--max-age=N] [--keep-last=K] [--json]`:
//! runs the retention engine (§4.10). Exit 0 on success, 4 on an invalid
//! numeric argument. `--force` is required to actually delete unless
//! `--dry-run` is also given; outside a TTY (or under `NON_INTERACTIVE`/
//! `CI`), an unconfirmed destructive prune is refused rather than guessed.

use std::time::Duration;

use dd_catalog::Settings;
use dd_state::retention::RetentionError;
use dd_state::{prune as run_prune, PruneOptions, PruneReport, StateLayout};
use serde::Serialize;

use crate::color::non_interactive;
use crate::exit_error::ExitError;
use crate::output::{print_json, Envelope, OutputFormat};

const DEFAULT_MAX_AGE_DAYS: u64 = 30;
const DEFAULT_KEEP_LAST: usize = 5;

#[derive(Debug, Serialize)]
struct PruneOutcome {
    dry_run: bool,
    pruned_count: u64,
    bytes_freed: u64,
    pruned_paths: Vec<String>,
}

impl From<PruneReport> for PruneOutcome {
    fn from(report: PruneReport) -> Self {
        Self {
            dry_run: false,
            pruned_count: report.pruned_count,
            bytes_freed: report.bytes_freed,
            pruned_paths: report.pruned_paths,
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub fn handle(
    settings: &Settings,
    dry_run: bool,
    force: bool,
    max_age: Option<&str>,
    keep_last: Option<&str>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let max_age_days = parse_arg(max_age, DEFAULT_MAX_AGE_DAYS, "--max-age")?;
    let keep_last_n = parse_arg(keep_last, DEFAULT_KEEP_LAST as u64, "--keep-last")? as usize;

    if !dry_run && !force && non_interactive() {
        return Err(ExitError::new(
            4,
            "refusing to prune without --force in a non-interactive session; pass --dry-run to preview",
        )
        .into());
    }

    let layout = StateLayout::new(&settings.state_dir);
    let opts = PruneOptions {
        max_age: Duration::from_secs(max_age_days * 24 * 60 * 60),
        keep_last: keep_last_n,
        dry_run,
    };

    let report = run_prune(&layout, &opts).map_err(retention_exit_error)?;
    let mut outcome: PruneOutcome = report.into();
    outcome.dry_run = dry_run;

    match format {
        OutputFormat::Json => {
            print_json(&Envelope::success("prune", outcome)).map_err(|e| ExitError::new(1, e.to_string()))?;
        }
        OutputFormat::Text => print_text(&outcome),
    }

    Ok(())
}

fn retention_exit_error(e: RetentionError) -> ExitError {
    match e {
        RetentionError::Core(c) => ExitError::new(c.exit_code(), c.to_string()),
        RetentionError::Io(io) => ExitError::new(1, io.to_string()),
    }
}

fn parse_arg(value: Option<&str>, default: u64, flag: &str) -> Result<u64, ExitError> {
    match value {
        None => Ok(default),
        Some(raw) => raw.parse::<u64>().map_err(|_| ExitError::new(4, format!("invalid numeric argument for {flag}: {raw}"))),
    }
}

#[cfg(test)]
#[path = "prune_tests.rs"]
mod tests;

fn print_text(outcome: &PruneOutcome) {
    use crate::color::{header, muted};

    if outcome.dry_run {
        println!("{} (dry run, nothing removed)", header("prune report"));
    } else {
        println!("{}", header("prune report"));
    }
    println!("  pruned: {}", outcome.pruned_count);
    println!("  bytes freed: {}", outcome.bytes_freed);
    if outcome.pruned_paths.is_empty() {
        println!("  {}", muted("nothing to prune"));
    }
    for path in &outcome.pruned_paths {
        println!("  {path}");
    }
}
