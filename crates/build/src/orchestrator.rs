// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The build matrix orchestrator: resolves a strategy per target, dispatches
//! non-skipped targets with bounded concurrency, and finalizes the run.

use std::time::{Duration, Instant};

use dd_adapters::{NotificationCenter, NotifyEvent, Signer};
use dd_catalog::{HostCatalog, ToolConfig};
use dd_core::platform::Platform;
use dd_core::{BuildMethod, CoreError, RunId};
use dd_hosts::{HealthProbe, HostSelector};
use dd_state::{manifest::Manifest, run::TargetResult, runlog, Run, StateLayout};
use futures_util::{stream, StreamExt};

use crate::strategy::{self, BuildStrategy};

/// At most this many targets are dispatched at once when the host catalog
/// carries no usable concurrency information (e.g. an empty catalog).
const FALLBACK_CONCURRENCY: usize = 1;

pub struct Orchestrator<'a> {
    layout: &'a StateLayout,
    hosts: &'a HostCatalog,
    health: &'a HealthProbe<'a>,
    selector: HostSelector<'a>,
    signer: &'a dyn Signer,
    notifier: &'a NotificationCenter,
    build_timeout: Duration,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        layout: &'a StateLayout,
        hosts: &'a HostCatalog,
        health: &'a HealthProbe<'a>,
        signer: &'a dyn Signer,
        notifier: &'a NotificationCenter,
        build_timeout: Duration,
    ) -> Self {
        Self {
            layout,
            hosts,
            health,
            selector: HostSelector::new(layout, hosts, health),
            signer,
            notifier,
            build_timeout,
        }
    }

    fn concurrency_limit(&self) -> usize {
        let total: u32 = self.hosts.all().map(|h| h.concurrency_cap).sum();
        usize::try_from(total).unwrap_or(FALLBACK_CONCURRENCY).max(FALLBACK_CONCURRENCY)
    }

    /// Resolve and build every target in `tool.targets`, writing and
    /// (optionally) signing the manifest, then emitting one notification
    /// event for the run.
    pub async fn build_matrix(
        &self,
        tool: &ToolConfig,
        version: &str,
        run_id: RunId,
        started_at_ms: u64,
        epoch_ms: u64,
    ) -> Result<Manifest, CoreError> {
        let mut run = Run::new(run_id.clone(), tool.tool_name.clone(), version.to_string(), tool.targets.clone(), started_at_ms);

        let run_id_str = run_id.to_string();
        let limit = self.concurrency_limit();
        let results: Vec<TargetResult> = stream::iter(tool.targets.iter())
            .map(|target| self.build_target(tool, version, &run_id_str, target, epoch_ms))
            .buffer_unordered(limit)
            .collect()
            .await;

        for result in results {
            self.log_target_finished(&run_id_str, &result);
            run.record(result);
        }

        let status = run.finalize();
        let mut manifest = Manifest::from_run(&run);

        let manifest_path = self.layout.manifest_path(&tool.tool_name, version);
        if self.signer.is_configured() {
            let bytes = serde_json::to_vec(&manifest)?;
            match self.signer.sign(&bytes).await {
                Ok(_signature) => manifest.signed_at = Some(epoch_ms),
                Err(e) => tracing::warn!(error = %e, "manifest signing failed"),
            }
        }
        manifest.write_atomic(&manifest_path).map_err(|e| match e {
            dd_state::manifest::ManifestError::Core(c) => c,
            dd_state::manifest::ManifestError::Json(j) => CoreError::Json(j),
        })?;

        let date = chrono_date_from_epoch_ms(epoch_ms);
        let log_path = self.layout.log_file(&date);
        let _ = runlog::append(
            &log_path,
            &runlog::RunEvent::ManifestWritten {
                run_id: run_id_str.clone(),
                path: manifest_path.display().to_string(),
            },
        );

        let event = NotifyEvent {
            run_id: run_id_str.clone(),
            event_kind: "run_finished".to_string(),
            title: format!("{} {version}", tool.tool_name),
            message: format!("run {status:?} ({} targets)", manifest.artifacts.len()),
        };
        let failed_sinks = self.notifier.notify(&event).await;
        for sink in failed_sinks {
            let _ = runlog::append(
                &log_path,
                &runlog::RunEvent::NotificationSent {
                    run_id: run_id_str.clone(),
                    event_kind: event.event_kind.clone(),
                    sink: format!("{sink} (failed)"),
                },
            );
        }

        Ok(manifest)
    }

    fn log_target_finished(&self, run_id: &str, result: &TargetResult) {
        tracing::info!(
            run_id,
            target = %result.platform,
            status = ?result.status,
            duration_ms = result.duration_ms,
            "target finished"
        );
    }

    async fn build_target(
        &self,
        tool: &ToolConfig,
        version: &str,
        run_id: &str,
        target: &Platform,
        epoch_ms: u64,
    ) -> TargetResult {
        match strategy::resolve(tool, target, self.health, epoch_ms).await {
            BuildStrategy::Skip { reason } => TargetResult::skipped(target.clone(), reason),
            BuildStrategy::Act { job, matrix, env } => {
                self.run_act_target(tool, version, run_id, target, &job, &matrix, &env).await
            }
            BuildStrategy::Native { host, env, remote_path } => {
                self.run_native_target(tool, version, run_id, target, &host, &env, &remote_path, epoch_ms)
                    .await
            }
        }
    }

    async fn run_act_target(
        &self,
        tool: &ToolConfig,
        version: &str,
        run_id: &str,
        target: &Platform,
        job: &str,
        matrix: &std::collections::HashMap<String, String>,
        env: &std::collections::HashMap<String, String>,
    ) -> TargetResult {
        let start = Instant::now();
        match crate::act_runner::run(self.layout, tool, version, target, run_id, job, matrix, env).await {
            Ok(outcome) => TargetResult {
                platform: target.clone(),
                host: None,
                method: Some(BuildMethod::act(job.to_string())),
                status: dd_state::run::TargetStatus::Success,
                artifact_path: Some(outcome.artifact_path.display().to_string()),
                duration_ms: start.elapsed().as_millis() as u64,
                log_path: Some(outcome.log_path.display().to_string()),
                error: None,
            },
            Err(e) => TargetResult {
                platform: target.clone(),
                host: None,
                method: Some(BuildMethod::act(job.to_string())),
                status: dd_state::run::TargetStatus::Failure,
                artifact_path: None,
                duration_ms: start.elapsed().as_millis() as u64,
                log_path: None,
                error: Some(e.to_string()),
            },
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn run_native_target(
        &self,
        tool: &ToolConfig,
        version: &str,
        run_id: &str,
        target: &Platform,
        host: &str,
        env: &std::collections::HashMap<String, String>,
        remote_path: &str,
        _epoch_ms: u64,
    ) -> TargetResult {
        let start = Instant::now();

        if let Err(e) = self.selector.acquire_slot(host, run_id) {
            return match e {
                dd_hosts::SelectorError::AtCapacity(_) => {
                    TargetResult::skipped(target.clone(), format!("host {host} at capacity"))
                }
                other => TargetResult {
                    platform: target.clone(),
                    host: Some(dd_core::HostName::from(host.to_string())),
                    method: Some(BuildMethod::native(host.to_string())),
                    status: dd_state::run::TargetStatus::Failure,
                    artifact_path: None,
                    duration_ms: start.elapsed().as_millis() as u64,
                    log_path: None,
                    error: Some(other.to_string()),
                },
            };
        }

        let result = self.run_native_locked(tool, version, target, host, env, remote_path).await;
        self.selector.release_slot(host, run_id);

        match result {
            Ok(outcome) => TargetResult {
                platform: target.clone(),
                host: Some(dd_core::HostName::from(host.to_string())),
                method: Some(BuildMethod::native(host.to_string())),
                status: dd_state::run::TargetStatus::Success,
                artifact_path: Some(outcome.artifact_path.display().to_string()),
                duration_ms: start.elapsed().as_millis() as u64,
                log_path: None,
                error: None,
            },
            Err(e) => TargetResult {
                platform: target.clone(),
                host: Some(dd_core::HostName::from(host.to_string())),
                method: Some(BuildMethod::native(host.to_string())),
                status: dd_state::run::TargetStatus::Failure,
                artifact_path: None,
                duration_ms: start.elapsed().as_millis() as u64,
                log_path: None,
                error: Some(e.to_string()),
            },
        }
    }

    async fn run_native_locked(
        &self,
        tool: &ToolConfig,
        version: &str,
        target: &Platform,
        host: &str,
        env: &std::collections::HashMap<String, String>,
        remote_path: &str,
    ) -> Result<crate::native_runner::NativeOutcome, CoreError> {
        let host_record = self
            .hosts
            .get(host)
            .map_err(|_| CoreError::Config(format!("unknown host {host}")))?;
        crate::native_runner::run(
            self.layout,
            host_record,
            &tool.tool_name,
            version,
            target,
            &tool.binary_name,
            &tool.build_cmd,
            remote_path,
            env,
            self.build_timeout,
        )
        .await
    }
}

/// `YYYY-MM-DD` for the log directory, derived from an epoch-ms timestamp
/// the caller supplies (never read from the system clock here, so
/// orchestration stays testable with a fixed `epoch_ms`).
fn chrono_date_from_epoch_ms(epoch_ms: u64) -> String {
    chrono::DateTime::from_timestamp_millis(epoch_ms as i64)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "1970-01-01".to_string())
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
