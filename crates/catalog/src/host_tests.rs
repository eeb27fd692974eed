// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

const YAML: &str = r#"
hosts:
  - hostname: mac-mini-1
    platform: darwin/arm64
    connection: local
    concurrency_cap: 2
    description: "mac mini in the closet"
  - hostname: win-ci-1
    platform: windows/amd64
    connection: ssh
    concurrency_cap: 1
    ssh:
      address: 10.0.0.5
      user: builder
"#;

#[test]
fn parses_hosts_in_order() {
    let catalog = HostCatalog::from_yaml(YAML).unwrap();
    assert_eq!(catalog.len(), 2);
    let names: Vec<_> = catalog.all().map(|h| h.hostname.as_str()).collect();
    assert_eq!(names, vec!["mac-mini-1", "win-ci-1"]);
}

#[test]
fn get_returns_unknown_host_error() {
    let catalog = HostCatalog::from_yaml(YAML).unwrap();
    let err = catalog.get("nope").unwrap_err();
    assert!(matches!(err, HostCatalogError::UnknownHost(h) if h == "nope"));
}

#[test]
fn ssh_endpoint_defaults_user() {
    let yaml = r#"
hosts:
  - hostname: h1
    platform: linux/amd64
    connection: ssh
    concurrency_cap: 1
    ssh:
      address: 10.0.0.1
"#;
    let catalog = HostCatalog::from_yaml(yaml).unwrap();
    let host = catalog.get("h1").unwrap();
    assert_eq!(host.ssh.as_ref().unwrap().user, "builder");
}

#[test]
fn rejects_duplicate_hostnames() {
    let yaml = r#"
hosts:
  - hostname: dup
    platform: linux/amd64
    connection: local
    concurrency_cap: 1
  - hostname: dup
    platform: linux/amd64
    connection: local
    concurrency_cap: 1
"#;
    let err = HostCatalog::from_yaml(yaml).unwrap_err();
    assert!(matches!(err, HostCatalogError::DuplicateHost(h) if h == "dup"));
}

#[test]
fn rejects_unknown_fields() {
    let yaml = r#"
hosts:
  - hostname: h1
    platform: linux/amd64
    connection: local
    concurrency_cap: 1
    bogus_field: true
"#;
    assert!(HostCatalog::from_yaml(yaml).is_err());
}

#[test]
fn load_reads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hosts.yaml");
    std::fs::write(&path, YAML).unwrap();
    let catalog = HostCatalog::load(&path).unwrap();
    assert_eq!(catalog.len(), 2);
}

#[yare::parameterized(
    local = { "local", Connection::Local },
    ssh = { "ssh", Connection::Ssh },
)]
fn connection_parses_from_its_snake_case_yaml_tag(tag: &str, expected: Connection) {
    let parsed: Connection = serde_yaml::from_str(tag).unwrap();
    assert_eq!(parsed, expected);
}
