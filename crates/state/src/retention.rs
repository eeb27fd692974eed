// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The retention engine: prunes old build-run directories by age, except
//! that the `keep_last` most-recently-modified runs per (tool, version)
//! are always retained. Keep-last always wins over age (see the design
//! notes' first open question): a protected run is never removed no
//! matter how old it is.

use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use dd_core::guardrail::Whitelist;
use serde::Serialize;

use crate::layout::StateLayout;

#[derive(Debug, thiserror::Error)]
pub enum RetentionError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Core(#[from] dd_core::CoreError),
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct PruneReport {
    pub pruned_count: u64,
    pub bytes_freed: u64,
    pub pruned_paths: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct PruneOptions {
    pub max_age: Duration,
    pub keep_last: usize,
    pub dry_run: bool,
}

struct Candidate {
    path: PathBuf,
    modified: SystemTime,
    size: u64,
}

/// Prune build-run directories under `layout`'s `builds/` tree according
/// to `opts`. Every deletion routes through [`Whitelist::safe_remove`]; a
/// deletion that would escape the whitelisted root is a hard error, not a
/// silent skip.
pub fn prune(layout: &StateLayout, opts: &PruneOptions) -> Result<PruneReport, RetentionError> {
    let whitelist = Whitelist::new(layout.whitelisted_roots());
    let builds_root = layout.root().join("builds");
    let now = SystemTime::now();
    let mut report = PruneReport::default();

    let Ok(tool_dirs) = std::fs::read_dir(&builds_root) else {
        return Ok(report);
    };

    for tool_entry in tool_dirs.filter_map(|e| e.ok()) {
        if !tool_entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
            continue;
        }
        let Ok(version_dirs) = std::fs::read_dir(tool_entry.path()) else {
            continue;
        };

        for version_entry in version_dirs.filter_map(|e| e.ok()) {
            if !version_entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                continue;
            }

            let mut candidates = collect_run_dirs(&version_entry.path())?;
            candidates.sort_by_key(|c| std::cmp::Reverse(c.modified));

            for candidate in candidates.into_iter().skip(opts.keep_last) {
                let age = now
                    .duration_since(candidate.modified)
                    .unwrap_or(Duration::ZERO);
                if age < opts.max_age {
                    continue;
                }

                if !opts.dry_run {
                    whitelist.safe_remove(&candidate.path)?;
                }
                report.pruned_count += 1;
                report.bytes_freed += candidate.size;
                report.pruned_paths.push(candidate.path.display().to_string());
            }
        }
    }

    report.pruned_paths.sort();
    Ok(report)
}

fn collect_run_dirs(version_dir: &std::path::Path) -> Result<Vec<Candidate>, RetentionError> {
    let mut out = Vec::new();
    for entry in std::fs::read_dir(version_dir)?.filter_map(|e| e.ok()) {
        let meta = entry.metadata()?;
        if !meta.is_dir() {
            continue;
        }
        out.push(Candidate {
            path: entry.path(),
            modified: meta.modified()?,
            size: dir_size(&entry.path()).unwrap_or(0),
        });
    }
    Ok(out)
}

fn dir_size(path: &std::path::Path) -> std::io::Result<u64> {
    let mut total = 0u64;
    for entry in std::fs::read_dir(path)?.filter_map(|e| e.ok()) {
        let meta = entry.metadata()?;
        if meta.is_dir() {
            total += dir_size(&entry.path())?;
        } else {
            total += meta.len();
        }
    }
    Ok(total)
}

#[cfg(test)]
#[path = "retention_tests.rs"]
mod tests;
