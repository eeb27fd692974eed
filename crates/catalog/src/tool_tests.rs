// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

const YAML: &str = r#"
tools:
  - tool_name: widget
    repo: "https://example.com/widget.git"
    local_path: /src/widget
    language: rust
    binary_name: widget
    build_cmd: "cargo build --release"
    targets:
      - linux/amd64
      - darwin/arm64
      - windows/amd64
    workflow: .github/workflows/release.yml
    act_job_map:
      linux/amd64: build
      darwin/arm64: null
      windows/amd64: null
    cross_compile:
      darwin/arm64:
        method: native
      windows/amd64:
        method: native
"#;

#[test]
fn parses_tool_with_targets() {
    let catalog = ToolCatalog::from_yaml(YAML).unwrap();
    let tool = catalog.get("widget").unwrap();
    assert_eq!(tool.targets.len(), 3);
    assert_eq!(tool.binary_name, "widget");
}

#[test]
fn act_job_map_preserves_null_entries() {
    let catalog = ToolCatalog::from_yaml(YAML).unwrap();
    let tool = catalog.get("widget").unwrap();
    let linux: Platform = "linux/amd64".parse().unwrap();
    let darwin: Platform = "darwin/arm64".parse().unwrap();
    assert_eq!(tool.act_job_map.get(&linux).unwrap().as_deref(), Some("build"));
    assert_eq!(tool.act_job_map.get(&darwin).unwrap().as_deref(), None);
}

#[test]
fn cross_compile_method_is_native() {
    let catalog = ToolCatalog::from_yaml(YAML).unwrap();
    let tool = catalog.get("widget").unwrap();
    let darwin: Platform = "darwin/arm64".parse().unwrap();
    assert_eq!(tool.cross_compile.get(&darwin).unwrap().method, "native");
}

#[test]
fn unknown_tool_is_an_error() {
    let catalog = ToolCatalog::from_yaml(YAML).unwrap();
    assert!(matches!(
        catalog.get("nope"),
        Err(ToolCatalogError::UnknownTool(_))
    ));
}

#[test]
fn rejects_duplicate_tool_names() {
    let yaml = r#"
tools:
  - tool_name: dup
    repo: r
    local_path: /p
    language: rust
    binary_name: b
    build_cmd: c
    targets: []
  - tool_name: dup
    repo: r
    local_path: /p
    language: rust
    binary_name: b
    build_cmd: c
    targets: []
"#;
    assert!(matches!(
        ToolCatalog::from_yaml(yaml),
        Err(ToolCatalogError::DuplicateTool(_))
    ));
}
