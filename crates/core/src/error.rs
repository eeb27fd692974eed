// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The error taxonomy shared by every component of the orchestrator core.
//!
//! Each variant maps to one of the documented exit codes; `exit_code()`
//! is the single place that mapping lives so the CLI layer never has to
//! guess at it.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("required dependency missing: {0}")]
    DependencyMissing(String),

    #[error("host {0} unreachable")]
    Unreachable(String),

    #[error("host {0} is at capacity")]
    AtCapacity(String),

    #[error("build failed on {host} for {target}: {reason}")]
    BuildFailed {
        host: String,
        target: String,
        reason: String,
    },

    #[error("expected artifact not found at {0}")]
    ArtifactMissing(PathBuf),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("operation timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("refused to touch path outside whitelisted roots: {0}")]
    PathEscape(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid catalog: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid settings: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    /// The process exit code this error kind corresponds to (see the
    /// documented exit-code table: 0 success, 1 generic failure, 2
    /// dependency missing, 3 configuration invalid, 4 invalid argument).
    pub fn exit_code(&self) -> i32 {
        match self {
            CoreError::DependencyMissing(_) => 2,
            CoreError::Config(_) | CoreError::Yaml(_) | CoreError::Toml(_) => 3,
            _ => 1,
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
