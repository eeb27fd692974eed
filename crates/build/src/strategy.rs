// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The build strategy resolver: maps a (tool, target) pair to `Act`,
//! `Native`, or `Skip` using the tool's configuration and which hosts are
//! currently healthy.

use std::collections::HashMap;

use dd_catalog::ToolConfig;
use dd_core::platform::Platform;
use dd_hosts::HealthProbe;

#[derive(Debug, Clone, PartialEq)]
pub enum BuildStrategy {
    Act {
        job: String,
        matrix: HashMap<String, String>,
        env: HashMap<String, String>,
    },
    Native {
        host: String,
        env: HashMap<String, String>,
        remote_path: String,
    },
    Skip {
        reason: String,
    },
}

/// Resolve the strategy for `tool` at `target`. Healthy-host lookups go
/// through `health` so `Native` can pick the lexicographically-first
/// healthy host whose platform matches `target`.
pub async fn resolve(
    tool: &ToolConfig,
    target: &Platform,
    health: &HealthProbe<'_>,
    epoch_ms: u64,
) -> BuildStrategy {
    if let Some(Some(job)) = tool.act_job_map.get(target) {
        let matrix = tool.act_matrix.get(target).cloned().unwrap_or_default();
        let mut env = tool.env.clone();
        if let Some(cross) = tool.cross_compile.get(target) {
            env.extend(cross.env.clone());
        }
        return BuildStrategy::Act {
            job: job.clone(),
            matrix,
            env,
        };
    }

    if let Some(cross) = tool.cross_compile.get(target) {
        if cross.method == "native" {
            let mut healthy = match health.get_healthy(Some(target), epoch_ms).await {
                Ok(hosts) => hosts,
                Err(_) => Vec::new(),
            };
            healthy.sort();
            return match healthy.into_iter().next() {
                Some(host) => {
                    let mut env = tool.env.clone();
                    env.extend(cross.env.clone());
                    let remote_path = tool
                        .host_paths
                        .get(&host)
                        .cloned()
                        .unwrap_or_else(|| tool.local_path.clone());
                    BuildStrategy::Native {
                        host,
                        env,
                        remote_path,
                    }
                }
                None => BuildStrategy::Skip {
                    reason: format!("no healthy native host for {target}"),
                },
            };
        }
    }

    BuildStrategy::Skip {
        reason: format!("no producer configured for {target}"),
    }
}

#[cfg(test)]
#[path = "strategy_tests.rs"]
mod tests;
