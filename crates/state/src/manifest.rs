// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The per-run manifest: the durable record of what was built, where, and
//! whether it has been signed. Written atomically so a partial manifest is
//! never observable.

use std::path::Path;

use dd_core::guardrail;
use dd_core::platform::Platform;
use serde::{Deserialize, Serialize};

use crate::run::{Run, RunStatus, TargetStatus};

pub const SCHEMA_VERSION: &str = "1.0.0";

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error(transparent)]
    Core(#[from] dd_core::CoreError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestArtifact {
    pub platform: Platform,
    pub host: Option<String>,
    pub method: Option<String>,
    pub status: TargetStatus,
    pub artifact_path: Option<String>,
    pub duration_seconds: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub schema_version: String,
    pub tool: String,
    pub version: String,
    pub run_id: String,
    pub status: RunStatus,
    pub artifacts: Vec<ManifestArtifact>,
    pub signed_at: Option<u64>,
}

impl Manifest {
    pub fn from_run(run: &Run) -> Self {
        let artifacts = run
            .per_target
            .iter()
            .map(|t| ManifestArtifact {
                platform: t.platform.clone(),
                host: t.host.as_ref().map(|h| h.to_string()),
                method: t.method.as_ref().and_then(|m| m.method_name()).map(str::to_string),
                status: t.status,
                artifact_path: t.artifact_path.clone(),
                duration_seconds: t.duration_ms as f64 / 1000.0,
            })
            .collect();

        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            tool: run.tool.clone(),
            version: run.version.clone(),
            run_id: run.run_id.to_string(),
            status: run.status,
            artifacts,
            signed_at: None,
        }
    }

    pub fn write_atomic(&self, path: &Path) -> Result<(), ManifestError> {
        let bytes = serde_json::to_vec_pretty(self)?;
        guardrail::atomic_write(path, &bytes)?;
        Ok(())
    }

    pub fn read(path: &Path) -> Result<Self, ManifestError> {
        let bytes = std::fs::read(path).map_err(dd_core::CoreError::from)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;
