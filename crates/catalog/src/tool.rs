// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The tool catalog: per-tool build configuration, keyed by tool name.

use std::collections::HashMap;
use std::path::Path;

use dd_core::platform::Platform;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ToolCatalogError {
    #[error("failed to read tool catalog {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse tool catalog {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("duplicate tool name in catalog: {0}")]
    DuplicateTool(String),
    #[error("unknown tool: {0}")]
    UnknownTool(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CrossCompile {
    pub method: String,
    #[serde(default)]
    pub env: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolConfig {
    pub tool_name: String,
    pub repo: String,
    pub local_path: String,
    pub language: String,
    pub binary_name: String,
    pub build_cmd: String,
    pub targets: Vec<Platform>,
    #[serde(default)]
    pub workflow: Option<String>,
    #[serde(default)]
    pub act_job_map: HashMap<Platform, Option<String>>,
    #[serde(default)]
    pub act_matrix: HashMap<Platform, HashMap<String, String>>,
    #[serde(default)]
    pub env: HashMap<String, String>,
    #[serde(default)]
    pub cross_compile: HashMap<Platform, CrossCompile>,
    #[serde(default)]
    pub host_paths: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ToolCatalogFile {
    #[serde(default)]
    tools: Vec<ToolConfig>,
}

#[derive(Debug, Clone, Default)]
pub struct ToolCatalog {
    by_name: IndexMap<String, ToolConfig>,
}

impl ToolCatalog {
    pub fn from_yaml(yaml: &str) -> Result<Self, ToolCatalogError> {
        let file: ToolCatalogFile =
            serde_yaml::from_str(yaml).map_err(|source| ToolCatalogError::Parse {
                path: "<memory>".to_string(),
                source,
            })?;
        Self::from_records(file.tools)
    }

    pub fn load(path: &Path) -> Result<Self, ToolCatalogError> {
        let text = std::fs::read_to_string(path).map_err(|source| ToolCatalogError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let file: ToolCatalogFile =
            serde_yaml::from_str(&text).map_err(|source| ToolCatalogError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        Self::from_records(file.tools)
    }

    fn from_records(tools: Vec<ToolConfig>) -> Result<Self, ToolCatalogError> {
        let mut by_name = IndexMap::with_capacity(tools.len());
        for tool in tools {
            if by_name.contains_key(&tool.tool_name) {
                return Err(ToolCatalogError::DuplicateTool(tool.tool_name));
            }
            by_name.insert(tool.tool_name.clone(), tool);
        }
        Ok(Self { by_name })
    }

    pub fn get(&self, tool_name: &str) -> Result<&ToolConfig, ToolCatalogError> {
        self.by_name
            .get(tool_name)
            .ok_or_else(|| ToolCatalogError::UnknownTool(tool_name.to_string()))
    }

    pub fn all(&self) -> impl Iterator<Item = &ToolConfig> {
        self.by_name.values()
    }
}

#[cfg(test)]
#[path = "tool_tests.rs"]
mod tests;
