// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Drives the local hosted-workflow emulator (`act`) for targets resolved
//! to [`crate::strategy::BuildStrategy::Act`].

use std::path::Path;

use dd_adapters::subprocess::{run_with_timeout, ACT_TIMEOUT};
use dd_catalog::ToolConfig;
use dd_core::platform::Platform;
use dd_core::CoreError;
use dd_state::StateLayout;
use tokio::process::Command;

/// Outcome of a successful emulated-workflow run.
#[derive(Debug)]
pub struct ActOutcome {
    pub artifact_path: std::path::PathBuf,
    pub log_path: std::path::PathBuf,
}

/// Run `tool`'s workflow `job` under the emulator for `target`, with
/// `matrix` and `env` composed by the strategy resolver.
#[allow(clippy::too_many_arguments)]
pub async fn run(
    layout: &StateLayout,
    tool: &ToolConfig,
    version: &str,
    target: &Platform,
    run_id: &str,
    job: &str,
    matrix: &std::collections::HashMap<String, String>,
    env: &std::collections::HashMap<String, String>,
) -> Result<ActOutcome, CoreError> {
    let workflow = tool
        .workflow
        .as_deref()
        .ok_or_else(|| CoreError::Config(format!("tool {} has no workflow configured", tool.tool_name)))?;

    let run_dir = layout.build_run_dir(&tool.tool_name, version, run_id);
    std::fs::create_dir_all(&run_dir)?;
    let log_path = run_dir.join("act.log");

    let mut cmd = Command::new("act");
    cmd.arg("--workflows").arg(workflow);
    cmd.arg("--job").arg(job);
    for (k, v) in matrix {
        cmd.arg("--matrix").arg(format!("{k}:{v}"));
    }
    for (k, v) in env {
        cmd.env(k, v);
    }

    let output = run_with_timeout(cmd, ACT_TIMEOUT, "act")
        .await
        .map_err(|reason| CoreError::BuildFailed {
            host: "local".to_string(),
            target: target.to_string(),
            reason,
        })?;

    let mut combined = output.stdout.clone();
    combined.extend_from_slice(&output.stderr);
    std::fs::write(&log_path, &combined)?;

    if !output.status.success() {
        return Err(CoreError::BuildFailed {
            host: "local".to_string(),
            target: target.to_string(),
            reason: format!("act exited with {}", output.status),
        });
    }

    let binary_name = format!("{}{}", tool.binary_name, target.binary_suffix());
    let produced = Path::new(&tool.local_path).join(&binary_name);
    if !produced.exists() {
        return Err(CoreError::ArtifactMissing(produced));
    }

    let artifacts_dir = layout.artifacts_dir(&tool.tool_name, version);
    std::fs::create_dir_all(&artifacts_dir)?;
    let artifact_path = artifacts_dir.join(&binary_name);
    std::fs::copy(&produced, &artifact_path)?;

    Ok(ActOutcome {
        artifact_path,
        log_path,
    })
}

#[cfg(test)]
#[path = "act_runner_tests.rs"]
mod tests;
