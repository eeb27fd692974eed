// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Drives a remote build over SSH for targets resolved to
//! [`crate::strategy::BuildStrategy::Native`].

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use dd_catalog::HostRecord;
use dd_core::platform::Platform;
use dd_core::{escape_for_shell, CoreError};
use dd_state::StateLayout;
use tokio::process::Command;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug)]
pub struct NativeOutcome {
    pub artifact_path: PathBuf,
}

/// Build the `sh -c` command line run on the remote host: `cd` into
/// `remote_path`, export every env var single-quoted, then run
/// `build_cmd`. Pulled out of [`run`] so command composition can be
/// fuzzed directly without an SSH connection.
fn compose_remote_command(remote_path: &str, env: &HashMap<String, String>, build_cmd: &str) -> String {
    let exports: String = env
        .iter()
        .map(|(k, v)| format!("export {}='{}'; ", k, escape_for_shell(v)))
        .collect();
    format!("cd '{remote_path}' && {exports}{build_cmd}")
}

/// Build `tool` at `target` on `host` over SSH, then copy the resulting
/// binary back to the local artifact root.
#[allow(clippy::too_many_arguments)]
pub async fn run(
    layout: &StateLayout,
    host: &HostRecord,
    tool_name: &str,
    version: &str,
    target: &Platform,
    binary_name: &str,
    build_cmd: &str,
    remote_path: &str,
    env: &HashMap<String, String>,
    timeout: Duration,
) -> Result<NativeOutcome, CoreError> {
    if remote_path.contains('\'') {
        return Err(CoreError::PathEscape(PathBuf::from(remote_path)));
    }

    let ssh = host
        .ssh
        .as_ref()
        .ok_or_else(|| CoreError::Config(format!("host {} has no ssh endpoint", host.hostname)))?;

    let mut builder = openssh::SessionBuilder::default();
    builder.user(ssh.user.clone());
    if let Some(port) = ssh.port {
        builder.port(port);
    }
    let session = match tokio::time::timeout(CONNECT_TIMEOUT, builder.connect(&ssh.address)).await {
        Ok(Ok(session)) => session,
        Ok(Err(_)) | Err(_) => return Err(CoreError::Unreachable(host.hostname.clone())),
    };

    let remote_cmd = compose_remote_command(remote_path, env, build_cmd);

    let status = tokio::time::timeout(
        timeout,
        session.command("sh").arg("-c").arg(&remote_cmd).status(),
    )
    .await;

    let status = match status {
        Ok(Ok(status)) => status,
        Ok(Err(ssh_err)) => {
            let _ = session.close().await;
            return Err(CoreError::BuildFailed {
                host: host.hostname.clone(),
                target: target.to_string(),
                reason: ssh_err.to_string(),
            });
        }
        Err(_elapsed) => {
            let _ = session.close().await;
            return Err(CoreError::Timeout(timeout));
        }
    };

    if !status.success() {
        let _ = session.close().await;
        return Err(CoreError::BuildFailed {
            host: host.hostname.clone(),
            target: target.to_string(),
            reason: format!("remote build exited with {status}"),
        });
    }
    let _ = session.close().await;

    let remote_binary = format!("{remote_path}/{binary_name}{}", target.binary_suffix());
    let artifacts_dir = layout.artifacts_dir(tool_name, version);
    std::fs::create_dir_all(&artifacts_dir)?;
    let local_binary = format!("{binary_name}{}", target.binary_suffix());
    let artifact_path = artifacts_dir.join(&local_binary);

    let remote_spec = format!("{}@{}:{remote_binary}", ssh.user, ssh.address);

    let mut scp = Command::new("scp");
    if let Some(port) = ssh.port {
        scp.arg("-P").arg(port.to_string());
    }
    scp.arg(&remote_spec).arg(&artifact_path);
    let output = dd_adapters::subprocess::run_with_timeout(scp, Duration::from_secs(120), "scp")
        .await
        .map_err(|reason| CoreError::BuildFailed {
            host: host.hostname.clone(),
            target: target.to_string(),
            reason,
        })?;

    if !output.status.success() || !artifact_path.exists() {
        return Err(CoreError::ArtifactMissing(artifact_path));
    }

    Ok(NativeOutcome { artifact_path })
}

#[cfg(test)]
#[path = "native_runner_tests.rs"]
mod tests;
