// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Newline-delimited JSON event log under `logs/<date>/run.log`, so
//! `status` and future tooling can replay what happened in a run instead
//! of scraping text logs.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunEvent {
    TargetStarted {
        run_id: String,
        platform: String,
        host: String,
    },
    TargetFinished {
        run_id: String,
        platform: String,
        status: String,
    },
    ManifestWritten {
        run_id: String,
        path: String,
    },
    NotificationSent {
        run_id: String,
        event_kind: String,
        sink: String,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum RunLogError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Append `event` as one JSON line to `path`, creating parent directories
/// as needed. Appends are not atomic as a whole file the way manifest
/// writes are — losing the last line on crash is acceptable for a log.
pub fn append(path: &Path, event: &RunEvent) -> Result<(), RunLogError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut line = serde_json::to_string(event)?;
    line.push('\n');

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(line.as_bytes())?;
    Ok(())
}

/// Read every event previously appended to `path`, skipping lines that
/// fail to parse rather than aborting the whole replay.
pub fn read_all(path: &Path) -> Result<Vec<RunEvent>, RunLogError> {
    let text = match std::fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let events = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .filter_map(|l| match serde_json::from_str(l) {
            Ok(event) => Some(event),
            Err(e) => {
                tracing::warn!(line = l, error = %e, "skipping unparsable run log line");
                None
            }
        })
        .collect();

    Ok(events)
}

#[cfg(test)]
#[path = "runlog_tests.rs"]
mod tests;
