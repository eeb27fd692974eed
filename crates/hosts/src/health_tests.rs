// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn record_checked_at(checked_at_ms: u64, ttl_seconds: u64) -> HealthRecord {
    HealthRecord {
        hostname: "h".to_string(),
        reachable: true,
        capabilities: Vec::new(),
        checked_at_ms,
        ttl_seconds,
    }
}

#[yare::parameterized(
    well_within_ttl = { record_checked_at(1_000, 300), 1_000 + 60_000, false },
    exactly_at_ttl = { record_checked_at(0, 300), 300_000, false },
    just_past_ttl = { record_checked_at(0, 300), 300_001, true },
    zero_ttl_is_immediately_stale = { record_checked_at(1_000, 0), 1_001, true },
)]
fn is_stale_matches_the_ttl_boundary(record: HealthRecord, now_ms: u64, expect_stale: bool) {
    assert_eq!(record.is_stale(now_ms), expect_stale);
}

fn local_catalog() -> HostCatalog {
    HostCatalog::from_yaml(
        r#"
hosts:
  - hostname: local-1
    platform: linux/amd64
    connection: local
    concurrency_cap: 2
"#,
    )
    .unwrap()
}

#[tokio::test]
async fn probe_local_host_is_reachable() {
    let dir = tempfile::tempdir().unwrap();
    let layout = StateLayout::new(dir.path());
    let catalog = local_catalog();
    let probe = HealthProbe::new(&layout, &catalog, Duration::from_secs(300));

    let record = probe.probe("local-1", 1_000).await.unwrap();
    assert!(record.reachable);
    assert_eq!(record.capabilities, vec!["linux/amd64".parse().unwrap()]);
}

#[tokio::test]
async fn get_uses_cache_when_fresh() {
    let dir = tempfile::tempdir().unwrap();
    let layout = StateLayout::new(dir.path());
    let catalog = local_catalog();
    let probe = HealthProbe::new(&layout, &catalog, Duration::from_secs(300));

    let first = probe.probe("local-1", 1_000).await.unwrap();
    let cached = probe.get("local-1", 1_500).await.unwrap();
    assert_eq!(first, cached);
}

#[tokio::test]
async fn get_reprobes_when_stale() {
    let dir = tempfile::tempdir().unwrap();
    let layout = StateLayout::new(dir.path());
    let catalog = local_catalog();
    let probe = HealthProbe::new(&layout, &catalog, Duration::from_secs(1));

    probe.probe("local-1", 1_000).await.unwrap();
    let refreshed = probe.get("local-1", 1_000 + 5_000).await.unwrap();
    assert_eq!(refreshed.checked_at_ms, 6_000);
}

#[tokio::test]
async fn get_healthy_filters_by_capability() {
    let dir = tempfile::tempdir().unwrap();
    let layout = StateLayout::new(dir.path());
    let catalog = local_catalog();
    let probe = HealthProbe::new(&layout, &catalog, Duration::from_secs(300));

    let linux: Platform = "linux/amd64".parse().unwrap();
    let darwin: Platform = "darwin/arm64".parse().unwrap();

    let matches = probe.get_healthy(Some(&linux), 1_000).await.unwrap();
    assert_eq!(matches, vec!["local-1".to_string()]);

    let none = probe.get_healthy(Some(&darwin), 1_000).await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn unreachable_ssh_host_has_no_capabilities() {
    let dir = tempfile::tempdir().unwrap();
    let layout = StateLayout::new(dir.path());
    let catalog = HostCatalog::from_yaml(
        r#"
hosts:
  - hostname: ghost
    platform: windows/amd64
    connection: ssh
    concurrency_cap: 1
    ssh:
      address: 198.51.100.1
"#,
    )
    .unwrap();
    let probe = HealthProbe::new(&layout, &catalog, Duration::from_secs(300));

    let record = probe.probe("ghost", 1_000).await.unwrap();
    assert!(!record.reachable);
    assert!(record.capabilities.is_empty());
}
