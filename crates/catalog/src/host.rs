// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The host catalog: a YAML-shaped declarative file describing the build
//! hosts the orchestrator is allowed to dispatch to.

use std::path::Path;

use dd_core::platform::Platform;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum HostCatalogError {
    #[error("failed to read host catalog {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse host catalog {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("duplicate hostname in catalog: {0}")]
    DuplicateHost(String),
    #[error("unknown host: {0}")]
    UnknownHost(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Connection {
    Local,
    Ssh,
}

/// SSH connection details, required when [`Connection::Ssh`] is used.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SshEndpoint {
    pub address: String,
    #[serde(default = "default_ssh_user")]
    pub user: String,
    #[serde(default)]
    pub port: Option<u16>,
}

fn default_ssh_user() -> String {
    "builder".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HostRecord {
    pub hostname: String,
    pub platform: Platform,
    pub connection: Connection,
    pub concurrency_cap: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub ssh: Option<SshEndpoint>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct HostCatalogFile {
    #[serde(default)]
    hosts: Vec<HostRecord>,
}

#[derive(Debug, Clone, Default)]
pub struct HostCatalog {
    by_name: IndexMap<String, HostRecord>,
}

impl HostCatalog {
    pub fn from_yaml(yaml: &str) -> Result<Self, HostCatalogError> {
        let file: HostCatalogFile =
            serde_yaml::from_str(yaml).map_err(|source| HostCatalogError::Parse {
                path: "<memory>".to_string(),
                source,
            })?;
        Self::from_records(file.hosts)
    }

    pub fn load(path: &Path) -> Result<Self, HostCatalogError> {
        let text = std::fs::read_to_string(path).map_err(|source| HostCatalogError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let file: HostCatalogFile =
            serde_yaml::from_str(&text).map_err(|source| HostCatalogError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        Self::from_records(file.hosts)
    }

    fn from_records(hosts: Vec<HostRecord>) -> Result<Self, HostCatalogError> {
        let mut by_name = IndexMap::with_capacity(hosts.len());
        for host in hosts {
            if by_name.contains_key(&host.hostname) {
                return Err(HostCatalogError::DuplicateHost(host.hostname));
            }
            by_name.insert(host.hostname.clone(), host);
        }
        Ok(Self { by_name })
    }

    pub fn get(&self, hostname: &str) -> Result<&HostRecord, HostCatalogError> {
        self.by_name
            .get(hostname)
            .ok_or_else(|| HostCatalogError::UnknownHost(hostname.to_string()))
    }

    pub fn all(&self) -> impl Iterator<Item = &HostRecord> {
        self.by_name.values()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

#[cfg(test)]
#[path = "host_tests.rs"]
mod tests;
