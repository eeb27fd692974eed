// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::collections::HashMap;

fn tool(local_path: &str, workflow: Option<&str>) -> ToolConfig {
    serde_json::from_value(serde_json::json!({
        "tool_name": "widget",
        "repo": "r",
        "local_path": local_path,
        "language": "rust",
        "binary_name": "widget",
        "build_cmd": "cargo build --release",
        "targets": ["linux/amd64"],
        "workflow": workflow,
    }))
    .unwrap()
}

#[tokio::test]
async fn missing_workflow_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let layout = StateLayout::new(dir.path());
    let tool = tool(dir.path().to_str().unwrap(), None);
    let target: Platform = "linux/amd64".parse().unwrap();

    let err = run(
        &layout,
        &tool,
        "1.0.0",
        &target,
        "run-1",
        "build",
        &HashMap::new(),
        &HashMap::new(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, CoreError::Config(_)));
}

#[tokio::test]
async fn nonexistent_emulator_is_build_failed() {
    let dir = tempfile::tempdir().unwrap();
    let layout = StateLayout::new(dir.path());
    let tool = tool(dir.path().to_str().unwrap(), Some("ci.yml"));
    let target: Platform = "linux/amd64".parse().unwrap();

    // The `act` binary is not guaranteed to exist on the test host, so the
    // failure path this exercises is the "spawn itself failed" branch of
    // run_with_timeout, which also surfaces as BuildFailed.
    let err = run(
        &layout,
        &tool,
        "1.0.0",
        &target,
        "run-1",
        "build",
        &HashMap::new(),
        &HashMap::new(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, CoreError::BuildFailed { .. }));
}
