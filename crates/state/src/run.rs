// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory run and per-target result records. A [`Run`] is created at
//! orchestration start, mutated only by the orchestrator, and finalized
//! into a [`crate::manifest::Manifest`]; it is never mutated after that.

use dd_core::platform::Platform;
use dd_core::{BuildMethod, HostName, RunId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Running,
    Success,
    Partial,
    Failure,
}

dd_core::simple_display! {
    RunStatus {
        Running => "running",
        Success => "success",
        Partial => "partial",
        Failure => "failure",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetStatus {
    Success,
    Failure,
    Skipped,
}

dd_core::simple_display! {
    TargetStatus {
        Success => "success",
        Failure => "failure",
        Skipped => "skipped",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetResult {
    pub platform: Platform,
    pub host: Option<HostName>,
    pub method: Option<BuildMethod>,
    pub status: TargetStatus,
    pub artifact_path: Option<String>,
    pub duration_ms: u64,
    pub log_path: Option<String>,
    pub error: Option<String>,
}

impl TargetResult {
    pub fn skipped(platform: Platform, reason: impl Into<String>) -> Self {
        Self {
            platform,
            host: None,
            method: None,
            status: TargetStatus::Skipped,
            artifact_path: None,
            duration_ms: 0,
            log_path: None,
            error: Some(reason.into()),
        }
    }
}

dd_core::builder! {
    pub struct TargetResultBuilder => TargetResult {
        set {
            platform: Platform = Platform::new("linux", "amd64"),
            status: TargetStatus = TargetStatus::Success,
            duration_ms: u64 = 10,
        }
        option {
            host: HostName = Some(HostName::new("h1")),
            method: BuildMethod = Some(BuildMethod::act("build")),
            artifact_path: String = Some("/artifacts/widget".to_string()),
            log_path: String = None,
            error: String = None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run {
    pub run_id: RunId,
    pub tool: String,
    pub version: String,
    pub targets: Vec<Platform>,
    pub started_at_ms: u64,
    pub status: RunStatus,
    pub per_target: Vec<TargetResult>,
}

impl Run {
    pub fn new(run_id: RunId, tool: impl Into<String>, version: impl Into<String>, targets: Vec<Platform>, started_at_ms: u64) -> Self {
        Self {
            run_id,
            tool: tool.into(),
            version: version.into(),
            targets,
            started_at_ms,
            status: RunStatus::Running,
            per_target: Vec::new(),
        }
    }

    pub fn record(&mut self, result: TargetResult) {
        self.per_target.push(result);
    }

    /// Recompute [`RunStatus`] from the recorded per-target results:
    /// `Success` iff every target succeeded, `Failure` iff none did,
    /// otherwise `Partial`. Skipped targets count toward neither tally.
    pub fn finalize(&mut self) -> RunStatus {
        let (mut succeeded, mut failed) = (0u32, 0u32);
        for t in &self.per_target {
            match t.status {
                TargetStatus::Success => succeeded += 1,
                TargetStatus::Failure => failed += 1,
                TargetStatus::Skipped => {}
            }
        }
        self.status = match (succeeded, failed) {
            (0, 0) => RunStatus::Failure,
            (_, 0) => RunStatus::Success,
            (0, _) => RunStatus::Failure,
            _ => RunStatus::Partial,
        };
        self.status
    }
}

dd_core::builder! {
    pub struct RunBuilder => Run {
        into {
            tool: String = "widget",
            version: String = "1.0.0",
        }
        set {
            run_id: RunId = RunId::generate(1),
            targets: Vec<Platform> = vec![Platform::new("linux", "amd64")],
            started_at_ms: u64 = 1,
            status: RunStatus = RunStatus::Running,
            per_target: Vec<TargetResult> = Vec::new(),
        }
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
