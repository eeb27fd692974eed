// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The host selector and concurrency arbiter: filters candidates by health
//! and target-platform affinity, ranks by score, and acquires a
//! concurrency slot through a filesystem lock protocol safe under
//! concurrent invocations.
//!
//! Slot acquisition is non-blocking: a host at capacity is skipped in
//! favor of the next candidate, never waited on.

use std::time::Duration;

use dd_catalog::HostCatalog;
use dd_core::platform::Platform;
use dd_state::StateLayout;

use crate::health::HealthProbe;

#[derive(Debug, thiserror::Error)]
pub enum SelectorError {
    #[error(transparent)]
    Health(#[from] crate::health::HealthError),
    #[error(transparent)]
    Core(#[from] dd_core::CoreError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("host {0} is at capacity")]
    AtCapacity(String),
    #[error("no healthy host with free capacity for target {0}")]
    NoHost(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub hostname: String,
    pub score: i64,
    pub usage: u32,
    pub limit: u32,
}

/// Directory-based mutex: `mkdir` is atomic across processes on POSIX
/// filesystems, so creating `<locks>/<host>/.mx` is the exclusion point
/// around the capacity read-then-write in [`acquire_slot`].
struct DirMutex {
    path: std::path::PathBuf,
}

impl DirMutex {
    fn acquire(path: std::path::PathBuf, timeout: Duration) -> Result<Self, std::io::Error> {
        let deadline = std::time::Instant::now() + timeout;
        loop {
            match std::fs::create_dir(&path) {
                Ok(()) => return Ok(Self { path }),
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    if std::time::Instant::now() >= deadline {
                        return Err(std::io::Error::new(
                            std::io::ErrorKind::TimedOut,
                            format!("timed out acquiring mutex at {}", path.display()),
                        ));
                    }
                    std::thread::sleep(Duration::from_millis(5));
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl Drop for DirMutex {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir(&self.path);
    }
}

const MUTEX_TIMEOUT: Duration = Duration::from_secs(5);

/// Candidate scoring, pulled out of [`HostSelector::candidates`] so it can
/// be exercised directly by property tests without a filesystem or health
/// probe fixture. Local connection outweighs a preference match, which in
/// turn outweighs a single unit of usage penalty.
fn score_candidate(local: bool, usage: u32, prefer_match: bool, platform_match: bool) -> i64 {
    let mut score: i64 = 0;
    if local {
        score += 100;
    }
    if prefer_match {
        score += 50;
    }
    score -= 10 * usage as i64;
    if platform_match {
        score += 5;
    }
    score
}

pub struct HostSelector<'a> {
    layout: &'a StateLayout,
    catalog: &'a HostCatalog,
    health: &'a HealthProbe<'a>,
}

impl<'a> HostSelector<'a> {
    pub fn new(layout: &'a StateLayout, catalog: &'a HostCatalog, health: &'a HealthProbe<'a>) -> Self {
        Self {
            layout,
            catalog,
            health,
        }
    }

    fn current_usage(&self, hostname: &str) -> Result<u32, std::io::Error> {
        let dir = self.layout.selector_locks_dir(hostname);
        match std::fs::read_dir(&dir) {
            Ok(entries) => Ok(entries
                .filter_map(|e| e.ok())
                .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("lock"))
                .count() as u32),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e),
        }
    }

    /// Rank healthy, non-full hosts for `target`. Ties break by hostname,
    /// ascending, for determinism.
    pub async fn candidates(
        &self,
        target: Option<&Platform>,
        prefer: Option<&str>,
        epoch_ms: u64,
    ) -> Result<Vec<Candidate>, SelectorError> {
        let healthy = self.health.get_healthy(target, epoch_ms).await?;

        let mut out = Vec::new();
        for hostname in healthy {
            let host = self.catalog.get(&hostname).map_err(|_| {
                SelectorError::NoHost(target.map(|t| t.to_string()).unwrap_or_default())
            })?;
            let usage = self.current_usage(&hostname)?;
            if usage >= host.concurrency_cap {
                continue;
            }

            let score = score_candidate(
                matches!(host.connection, dd_catalog::Connection::Local),
                usage,
                prefer == Some(hostname.as_str()),
                target.is_some_and(|t| &host.platform == t),
            );

            out.push(Candidate {
                hostname,
                score,
                usage,
                limit: host.concurrency_cap,
            });
        }

        out.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.hostname.cmp(&b.hostname)));
        Ok(out)
    }

    /// Reserve one concurrency slot on `hostname` for `run_id`. Non-blocking:
    /// fails immediately with [`SelectorError::AtCapacity`] rather than
    /// waiting for a slot to free up.
    pub fn acquire_slot(&self, hostname: &str, run_id: &str) -> Result<(), SelectorError> {
        let host = self
            .catalog
            .get(hostname)
            .map_err(|_| SelectorError::NoHost(hostname.to_string()))?;

        let mutex = DirMutex::acquire(self.layout.selector_mutex_dir(hostname), MUTEX_TIMEOUT)?;

        let usage = self.current_usage(hostname)?;
        if usage >= host.concurrency_cap {
            return Err(SelectorError::AtCapacity(hostname.to_string()));
        }

        let lock_path = self.layout.slot_lock_path(hostname, run_id);
        if let Some(parent) = lock_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&lock_path, run_id)?;

        drop(mutex);
        Ok(())
    }

    /// Release a previously acquired slot. Safe to call on an
    /// already-released or never-acquired slot.
    pub fn release_slot(&self, hostname: &str, run_id: &str) {
        let lock_path = self.layout.slot_lock_path(hostname, run_id);
        if let Err(e) = std::fs::remove_file(&lock_path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(host = hostname, run_id, error = %e, "failed to release slot lock");
            }
        }
    }

    /// Pick the highest-scoring candidate and acquire its slot, retrying
    /// the next candidate on [`SelectorError::AtCapacity`] until one
    /// succeeds or the candidate list is exhausted.
    pub async fn choose_host(
        &self,
        target: Option<&Platform>,
        prefer: Option<&str>,
        run_id: &str,
        epoch_ms: u64,
    ) -> Result<String, SelectorError> {
        let candidates = self.candidates(target, prefer, epoch_ms).await?;
        for candidate in candidates {
            match self.acquire_slot(&candidate.hostname, run_id) {
                Ok(()) => return Ok(candidate.hostname),
                Err(SelectorError::AtCapacity(_)) => continue,
                Err(e) => return Err(e),
            }
        }
        Err(SelectorError::NoHost(
            target.map(|t| t.to_string()).unwrap_or_default(),
        ))
    }
}

#[cfg(test)]
#[path = "selector_tests.rs"]
mod tests;
