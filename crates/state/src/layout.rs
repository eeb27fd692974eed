// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fixed on-disk layout under the state root:
//!
//! ```text
//! state/
//!   logs/<YYYY-MM-DD>/run.log
//!   logs/latest -> <YYYY-MM-DD>
//!   manifests/<tool>-<version>.json
//!   artifacts/<tool>/<version>/<binary>
//!   builds/<tool>/<version>/<run_id>/...
//!   selector/locks/<host>/<run_id>.lock
//!   health/<host>.json
//! ```

use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct StateLayout {
    root: PathBuf,
}

impl StateLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    pub fn log_file(&self, date: &str) -> PathBuf {
        self.logs_dir().join(date).join("run.log")
    }

    pub fn logs_latest_link(&self) -> PathBuf {
        self.logs_dir().join("latest")
    }

    pub fn manifests_dir(&self) -> PathBuf {
        self.root.join("manifests")
    }

    pub fn manifest_path(&self, tool: &str, version: &str) -> PathBuf {
        self.manifests_dir().join(format!("{tool}-{version}.json"))
    }

    pub fn manifest_signature_path(&self, tool: &str, version: &str) -> PathBuf {
        self.manifests_dir().join(format!("{tool}-{version}.json.sig"))
    }

    pub fn artifacts_dir(&self, tool: &str, version: &str) -> PathBuf {
        self.root.join("artifacts").join(tool).join(version)
    }

    pub fn artifact_path(&self, tool: &str, version: &str, binary: &str) -> PathBuf {
        self.artifacts_dir(tool, version).join(binary)
    }

    pub fn builds_dir(&self, tool: &str, version: &str) -> PathBuf {
        self.root.join("builds").join(tool).join(version)
    }

    pub fn build_run_dir(&self, tool: &str, version: &str, run_id: &str) -> PathBuf {
        self.builds_dir(tool, version).join(run_id)
    }

    pub fn selector_locks_dir(&self, host: &str) -> PathBuf {
        self.root.join("selector").join("locks").join(host)
    }

    pub fn slot_lock_path(&self, host: &str, run_id: &str) -> PathBuf {
        self.selector_locks_dir(host).join(format!("{run_id}.lock"))
    }

    pub fn selector_mutex_dir(&self, host: &str) -> PathBuf {
        self.selector_locks_dir(host).join(".mx")
    }

    pub fn health_dir(&self) -> PathBuf {
        self.root.join("health")
    }

    pub fn health_path(&self, host: &str) -> PathBuf {
        self.health_dir().join(format!("{host}.json"))
    }

    /// Every root this layout ever writes under or deletes from; the set
    /// that [`dd_core::guardrail::Whitelist`] should be constructed with.
    pub fn whitelisted_roots(&self) -> Vec<PathBuf> {
        vec![self.root.clone()]
    }
}
