// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn whitelist(root: &Path) -> Whitelist {
    Whitelist::new([root.to_path_buf()])
}

#[test]
fn safe_remove_refuses_paths_outside_whitelist() {
    let dir = tempfile::tempdir().unwrap();
    let wl = whitelist(dir.path());
    let err = wl.safe_remove(Path::new("/usr/bin/ls")).unwrap_err();
    assert!(matches!(err, CoreError::PathEscape(_)));
}

#[test]
fn safe_remove_refuses_the_root_itself() {
    let dir = tempfile::tempdir().unwrap();
    let wl = whitelist(dir.path());
    let err = wl.safe_remove(dir.path()).unwrap_err();
    assert!(matches!(err, CoreError::PathEscape(_)));
}

#[test]
fn safe_remove_deletes_files_under_root() {
    let dir = tempfile::tempdir().unwrap();
    let wl = whitelist(dir.path());
    let target = dir.path().join("x").join("y");
    std::fs::create_dir_all(target.parent().unwrap()).unwrap();
    std::fs::write(&target, b"hi").unwrap();

    wl.safe_remove(&target).unwrap();
    assert!(!target.exists());
}

#[test]
fn safe_remove_is_idempotent_on_missing_path() {
    let dir = tempfile::tempdir().unwrap();
    let wl = whitelist(dir.path());
    let target = dir.path().join("missing");
    wl.safe_remove(&target).unwrap();
    wl.safe_remove(&target).unwrap();
}

#[test]
fn resolve_rejects_empty_path() {
    assert!(resolve("").is_err());
}

#[test]
fn resolve_rejects_relative_path() {
    assert!(resolve("relative/path").is_err());
}

#[test]
fn resolve_accepts_absolute_path() {
    let resolved = resolve("/tmp/foo").unwrap();
    assert_eq!(resolved, PathBuf::from("/tmp/foo"));
}

#[test]
fn atomic_write_leaves_no_partial_file_on_success() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("manifest.json");
    atomic_write(&path, b"{}").unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), b"{}");
    assert!(!path.with_extension("tmp").exists());
}

#[test]
fn scoped_tempdir_removes_itself_on_drop() {
    let path = {
        let scoped = ScopedTempDir::new("dd-test").unwrap();
        let path = scoped.path().to_path_buf();
        assert!(path.exists());
        path
    };
    assert!(!path.exists());
}
