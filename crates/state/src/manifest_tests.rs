// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::run::{Run, TargetResult};
use dd_core::{BuildMethod, HostName, RunId};

fn sample_run() -> Run {
    let mut run = Run::new(
        RunId::generate(1),
        "widget",
        "1.0.0",
        vec!["linux/amd64".parse().unwrap()],
        1,
    );
    run.record(TargetResult {
        platform: "linux/amd64".parse().unwrap(),
        host: Some(HostName::new("mac-mini-1")),
        method: Some(BuildMethod::act("build")),
        status: TargetStatus::Success,
        artifact_path: Some("/artifacts/widget".into()),
        duration_ms: 2500,
        log_path: Some("/logs/run.log".into()),
        error: None,
    });
    run.finalize();
    run
}

#[test]
fn from_run_carries_schema_version_and_artifacts() {
    let run = sample_run();
    let manifest = Manifest::from_run(&run);
    assert_eq!(manifest.schema_version, SCHEMA_VERSION);
    assert_eq!(manifest.artifacts.len(), 1);
    assert_eq!(manifest.artifacts[0].duration_seconds, 2.5);
    assert_eq!(manifest.artifacts[0].method.as_deref(), Some("act"));
    assert!(manifest.signed_at.is_none());
}

#[test]
fn write_then_read_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("widget-1.0.0.json");
    let manifest = Manifest::from_run(&sample_run());

    manifest.write_atomic(&path).unwrap();
    let read_back = Manifest::read(&path).unwrap();

    assert_eq!(read_back.tool, manifest.tool);
    assert_eq!(read_back.artifacts.len(), manifest.artifacts.len());
}

#[test]
fn write_atomic_leaves_no_tmp_file_behind() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("widget-1.0.0.json");
    Manifest::from_run(&sample_run()).write_atomic(&path).unwrap();

    let tmp_files: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("tmp"))
        .collect();
    assert!(tmp_files.is_empty());
}
