// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Health probing: evaluates per-host reachability, caches results with a
//! freshness window, and poisons the cache for the same window on a
//! failed probe so a flapping host doesn't cause a probe storm.

use std::collections::HashSet;
use std::time::Duration;

use dd_catalog::{Connection, HostCatalog, HostRecord};
use dd_core::guardrail;
use dd_core::platform::Platform;
use dd_state::StateLayout;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum HealthError {
    #[error(transparent)]
    Core(#[from] dd_core::CoreError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("unknown host: {0}")]
    UnknownHost(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthRecord {
    pub hostname: String,
    pub reachable: bool,
    pub capabilities: Vec<Platform>,
    pub checked_at_ms: u64,
    pub ttl_seconds: u64,
}

impl HealthRecord {
    pub fn is_stale(&self, now_ms: u64) -> bool {
        let ttl_ms = self.ttl_seconds.saturating_mul(1000);
        now_ms.saturating_sub(self.checked_at_ms) > ttl_ms
    }
}

const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

pub struct HealthProbe<'a> {
    layout: &'a StateLayout,
    catalog: &'a HostCatalog,
    ttl_seconds: u64,
}

impl<'a> HealthProbe<'a> {
    pub fn new(layout: &'a StateLayout, catalog: &'a HostCatalog, ttl: Duration) -> Self {
        Self {
            layout,
            catalog,
            ttl_seconds: ttl.as_secs(),
        }
    }

    /// A host's capabilities are its own platform: native builds require an
    /// exact platform match (see the build strategy resolver), so this is
    /// the full capability set for now.
    fn capabilities_for(&self, host: &HostRecord) -> Vec<Platform> {
        vec![host.platform.clone()]
    }

    async fn probe_reachable(&self, host: &HostRecord) -> bool {
        let result = tokio::time::timeout(PROBE_TIMEOUT, async {
            match host.connection {
                Connection::Local => tokio::process::Command::new("true")
                    .status()
                    .await
                    .map(|s| s.success())
                    .unwrap_or(false),
                Connection::Ssh => {
                    let Some(ssh) = &host.ssh else {
                        return false;
                    };
                    probe_ssh(ssh).await
                }
            }
        })
        .await;

        matches!(result, Ok(true))
    }

    /// Probe `host` unconditionally (ignoring any cached record) and
    /// persist the result.
    pub async fn probe(&self, hostname: &str, epoch_ms: u64) -> Result<HealthRecord, HealthError> {
        let host = self
            .catalog
            .get(hostname)
            .map_err(|_| HealthError::UnknownHost(hostname.to_string()))?;

        let reachable = self.probe_reachable(host).await;
        let record = HealthRecord {
            hostname: hostname.to_string(),
            reachable,
            capabilities: if reachable {
                self.capabilities_for(host)
            } else {
                Vec::new()
            },
            checked_at_ms: epoch_ms,
            ttl_seconds: self.ttl_seconds,
        };

        self.persist(&record)?;
        Ok(record)
    }

    fn persist(&self, record: &HealthRecord) -> Result<(), HealthError> {
        let path = self.layout.health_path(&record.hostname);
        let bytes = serde_json::to_vec_pretty(record)?;
        guardrail::atomic_write(&path, &bytes)?;
        Ok(())
    }

    fn load_cached(&self, hostname: &str) -> Option<HealthRecord> {
        let path = self.layout.health_path(hostname);
        let bytes = std::fs::read(path).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    /// Read the cached record for `hostname`, reprobing if stale or absent.
    pub async fn get(&self, hostname: &str, epoch_ms: u64) -> Result<HealthRecord, HealthError> {
        if let Some(cached) = self.load_cached(hostname) {
            if !cached.is_stale(epoch_ms) {
                return Ok(cached);
            }
        }
        self.probe(hostname, epoch_ms).await
    }

    /// Every host whose cached (or freshly probed) health is reachable,
    /// optionally filtered by capability.
    pub async fn get_healthy(
        &self,
        capability: Option<&Platform>,
        epoch_ms: u64,
    ) -> Result<Vec<String>, HealthError> {
        let mut healthy = Vec::new();
        for host in self.catalog.all() {
            let record = self.get(&host.hostname, epoch_ms).await?;
            if !record.reachable {
                continue;
            }
            if let Some(capability) = capability {
                let caps: HashSet<&Platform> = record.capabilities.iter().collect();
                if !caps.contains(capability) {
                    continue;
                }
            }
            healthy.push(host.hostname.clone());
        }
        Ok(healthy)
    }
}

async fn probe_ssh(ssh: &dd_catalog::SshEndpoint) -> bool {
    let mut builder = openssh::SessionBuilder::default();
    builder.user(ssh.user.clone());
    if let Some(port) = ssh.port {
        builder.port(port);
    }
    let Ok(session) = builder.connect(&ssh.address).await else {
        return false;
    };
    let ok = session
        .command("true")
        .status()
        .await
        .map(|s| s.success())
        .unwrap_or(false);
    let _ = session.close().await;
    ok
}

#[cfg(test)]
#[path = "health_tests.rs"]
mod tests;
