// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn displays_as_tagged_string() {
    assert_eq!(BuildMethod::act("build").to_string(), "act:build");
    assert_eq!(BuildMethod::native("mac-mini-1").to_string(), "native:mac-mini-1");
    assert_eq!(BuildMethod::skip("no host").to_string(), "skip:no host");
}

#[test]
fn round_trips_through_display_and_parse() {
    for m in [
        BuildMethod::act("build"),
        BuildMethod::native("mac-mini-1"),
        BuildMethod::skip("no host"),
    ] {
        let parsed: BuildMethod = m.to_string().parse().unwrap();
        assert_eq!(parsed, m);
    }
}

#[test]
fn round_trips_through_json() {
    let m = BuildMethod::native("mac-mini-1");
    let json = serde_json::to_string(&m).unwrap();
    assert_eq!(json, "\"native:mac-mini-1\"");
    let back: BuildMethod = serde_json::from_str(&json).unwrap();
    assert_eq!(back, m);
}

#[test]
fn method_name_is_none_for_skip() {
    assert_eq!(BuildMethod::act("build").method_name(), Some("act"));
    assert_eq!(BuildMethod::native("h").method_name(), Some("native"));
    assert_eq!(BuildMethod::skip("why").method_name(), None);
    assert!(BuildMethod::skip("why").is_skip());
}
