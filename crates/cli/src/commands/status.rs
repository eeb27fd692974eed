// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `status [--refresh] [--json]`: reports `{last_run, config, signing,
//! hosts}` (§6, §10.6). Always exits 0 — a missing catalog or unreachable
//! host is reported as data, not treated as a command failure.

use std::time::{SystemTime, UNIX_EPOCH};

use dd_catalog::{HostCatalog, Settings, ToolCatalog};
use dd_hosts::HealthProbe;
use dd_state::{Manifest, StateLayout};
use serde::Serialize;

use crate::exit_error::ExitError;
use crate::output::{print_json, Envelope, OutputFormat};

#[derive(Debug, Serialize)]
struct LastRunReport {
    tool: String,
    version: String,
    run_id: String,
    status: String,
}

#[derive(Debug, Serialize)]
struct ConfigReport {
    config_dir: String,
    tools_loaded: usize,
    hosts_loaded: usize,
    tools_error: Option<String>,
    hosts_error: Option<String>,
}

#[derive(Debug, Serialize)]
struct SigningReport {
    configured: bool,
    helper_path: Option<String>,
}

#[derive(Debug, Serialize)]
struct HostReport {
    hostname: String,
    platform: String,
    reachable: bool,
}

#[derive(Debug, Serialize)]
struct StatusReport {
    last_run: Option<LastRunReport>,
    config: ConfigReport,
    signing: SigningReport,
    hosts: Vec<HostReport>,
}

pub async fn handle(settings: &Settings, refresh: bool, format: OutputFormat) -> anyhow::Result<()> {
    let layout = StateLayout::new(&settings.state_dir);

    let last_run = find_last_run(&layout);

    let tools_path = settings.config_dir.join("tools.yaml");
    let hosts_path = settings.config_dir.join("hosts.yaml");
    let tools = ToolCatalog::load(&tools_path);
    let hosts = HostCatalog::load(&hosts_path);

    let config = ConfigReport {
        config_dir: settings.config_dir.display().to_string(),
        tools_loaded: tools.as_ref().map(|t| t.all().count()).unwrap_or(0),
        hosts_loaded: hosts.as_ref().map(|h| h.all().count()).unwrap_or(0),
        tools_error: tools.as_ref().err().map(|e| e.to_string()),
        hosts_error: hosts.as_ref().err().map(|e| e.to_string()),
    };

    let signing = SigningReport {
        configured: settings.signing_helper.as_ref().is_some_and(|p| p.exists()),
        helper_path: settings.signing_helper.as_ref().map(|p| p.display().to_string()),
    };

    let host_reports = match &hosts {
        Ok(catalog) => collect_host_reports(&layout, catalog, refresh).await,
        Err(_) => Vec::new(),
    };

    let report = StatusReport {
        last_run,
        config,
        signing,
        hosts: host_reports,
    };

    match format {
        OutputFormat::Json => {
            print_json(&Envelope::success("status", report)).map_err(|e| ExitError::new(1, e.to_string()))?;
        }
        OutputFormat::Text => print_text(&report),
    }

    Ok(())
}

async fn collect_host_reports(layout: &StateLayout, catalog: &HostCatalog, refresh: bool) -> Vec<HostReport> {
    let health = HealthProbe::new(layout, catalog, std::time::Duration::from_secs(5 * 60));
    let epoch_ms = epoch_ms_now();
    let mut out = Vec::new();
    for host in catalog.all() {
        let record = if refresh {
            health.probe(&host.hostname, epoch_ms).await
        } else {
            health.get(&host.hostname, epoch_ms).await
        };
        let reachable = record.map(|r| r.reachable).unwrap_or(false);
        out.push(HostReport {
            hostname: host.hostname.clone(),
            platform: host.platform.to_string(),
            reachable,
        });
    }
    out
}

fn find_last_run(layout: &StateLayout) -> Option<LastRunReport> {
    let dir = layout.manifests_dir();
    let entries = std::fs::read_dir(&dir).ok()?;

    let newest = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("json"))
        .max_by_key(|e| e.metadata().and_then(|m| m.modified()).unwrap_or(UNIX_EPOCH))?;

    let manifest = Manifest::read(&newest.path()).ok()?;
    Some(LastRunReport {
        tool: manifest.tool,
        version: manifest.version,
        run_id: manifest.run_id,
        status: manifest.status.to_string(),
    })
}

fn epoch_ms_now() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis() as u64
}

fn print_text(report: &StatusReport) {
    use crate::color::{header, muted};

    println!("{}", header("last run"));
    match &report.last_run {
        Some(run) => println!("  {} {} [{}] {}", run.tool, run.version, run.run_id, run.status),
        None => println!("  {}", muted("none")),
    }

    println!("{}", header("config"));
    println!("  config_dir: {}", report.config.config_dir);
    println!("  tools loaded: {}", report.config.tools_loaded);
    println!("  hosts loaded: {}", report.config.hosts_loaded);
    if let Some(err) = &report.config.tools_error {
        println!("  {}: {err}", muted("tools error"));
    }
    if let Some(err) = &report.config.hosts_error {
        println!("  {}: {err}", muted("hosts error"));
    }

    println!("{}", header("signing"));
    println!("  configured: {}", report.signing.configured);
    if let Some(path) = &report.signing.helper_path {
        println!("  helper: {path}");
    }

    println!("{}", header("hosts"));
    if report.hosts.is_empty() {
        println!("  {}", muted("none"));
    }
    for host in &report.hosts {
        println!("  {} ({}) reachable={}", host.hostname, host.platform, host.reachable);
    }
}
