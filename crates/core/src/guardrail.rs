// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Path and resource guardrail: every mutating filesystem primitive the
//! orchestrator performs routes through here so that a whole class of
//! "deleted the wrong directory" bugs is impossible by construction.

use std::path::{Path, PathBuf};

use crate::error::{CoreError, CoreResult};

/// Resolve `path` to an absolute path, expanding a leading `~`.
pub fn resolve(path: &str) -> CoreResult<PathBuf> {
    if path.is_empty() {
        return Err(CoreError::Config("path must not be empty".into()));
    }

    let expanded = if let Some(rest) = path.strip_prefix('~') {
        let home = dirs::home_dir()
            .ok_or_else(|| CoreError::Config("cannot resolve home directory".into()))?;
        if rest.is_empty() {
            home
        } else if let Some(rest) = rest.strip_prefix('/') {
            home.join(rest)
        } else {
            return Err(CoreError::Config(format!(
                "unsupported tilde expansion in path: {path}"
            )));
        }
    } else {
        PathBuf::from(path)
    };

    if !expanded.is_absolute() {
        return Err(CoreError::Config(format!(
            "path must be absolute after expansion: {}",
            expanded.display()
        )));
    }

    Ok(expanded)
}

/// Roots under which deletion is ever permitted.
pub struct Whitelist {
    roots: Vec<PathBuf>,
}

impl Whitelist {
    pub fn new(roots: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            roots: roots.into_iter().collect(),
        }
    }

    fn contains(&self, candidate: &Path) -> bool {
        self.roots
            .iter()
            .any(|root| candidate.starts_with(root) && candidate != root)
    }

    /// Delete `path` (file or directory) iff it is strictly under one of
    /// the whitelisted roots. Missing paths succeed idempotently.
    pub fn safe_remove(&self, path: &Path) -> CoreResult<()> {
        if !self.contains(path) {
            return Err(CoreError::PathEscape(path.to_path_buf()));
        }

        match std::fs::metadata(path) {
            Ok(meta) if meta.is_dir() => std::fs::remove_dir_all(path)?,
            Ok(_) => std::fs::remove_file(path)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        Ok(())
    }
}

/// A scoped temporary directory under `/tmp` that removes itself on drop.
pub struct ScopedTempDir {
    path: PathBuf,
}

impl ScopedTempDir {
    pub fn new(prefix: &str) -> CoreResult<Self> {
        let unique = uuid::Uuid::new_v4();
        let path = std::env::temp_dir().join(format!("{prefix}.{unique}"));
        std::fs::create_dir_all(&path)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScopedTempDir {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_dir_all(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to clean up scoped tempdir");
            }
        }
    }
}

/// Write `contents` to `path` atomically via a temp-file-then-rename so a
/// partially written file is never observable.
pub fn atomic_write(path: &Path, contents: &[u8]) -> CoreResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension(format!(
        "{}.tmp",
        path.extension().and_then(|e| e.to_str()).unwrap_or("")
    ));
    std::fs::write(&tmp, contents)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
#[path = "guardrail_tests.rs"]
mod tests;
