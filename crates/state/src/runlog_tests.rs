// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn append_then_read_all_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("2026-07-31").join("run.log");

    let events = vec![
        RunEvent::TargetStarted {
            run_id: "run-1".into(),
            platform: "linux/amd64".into(),
            host: "mac-mini-1".into(),
        },
        RunEvent::ManifestWritten {
            run_id: "run-1".into(),
            path: "/state/manifests/widget-1.0.0.json".into(),
        },
    ];
    for e in &events {
        append(&path, e).unwrap();
    }

    let read_back = read_all(&path).unwrap();
    assert_eq!(read_back, events);
}

#[test]
fn read_all_of_missing_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope").join("run.log");
    assert_eq!(read_all(&path).unwrap(), Vec::new());
}

#[test]
fn read_all_skips_unparsable_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.log");
    std::fs::write(&path, "not json\n{\"kind\":\"manifest_written\",\"run_id\":\"r\",\"path\":\"p\"}\n").unwrap();

    let events = read_all(&path).unwrap();
    assert_eq!(events.len(), 1);
}
