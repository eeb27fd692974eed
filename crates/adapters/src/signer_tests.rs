// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn noop_signer_verifies_anything() {
    let signer = NoopSigner;
    let sig = signer.sign(b"hello").await.unwrap();
    assert!(signer.verify(b"hello", &sig).await.unwrap());
    assert!(!signer.is_configured());
}

#[tokio::test]
async fn shell_signer_round_trips_with_a_fake_helper() {
    let dir = tempfile::tempdir().unwrap();
    let helper = dir.path().join("sign-helper.sh");
    std::fs::write(
        &helper,
        "#!/bin/sh\nif [ \"$1\" = sign ]; then cat; exit 0; fi\nif [ \"$1\" = verify ]; then cat >/dev/null; exit 0; fi\nexit 1\n",
    )
    .unwrap();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&helper, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    let signer = ShellSigner::new(&helper);
    assert!(signer.is_configured());

    let sig = signer.sign(b"payload").await.unwrap();
    assert_eq!(sig.0, b"payload");
    assert!(signer.verify(b"payload", &sig).await.unwrap());
}

#[tokio::test]
async fn shell_signer_reports_not_configured_when_helper_missing() {
    let signer = ShellSigner::new("/nonexistent/helper");
    assert!(!signer.is_configured());
}

#[tokio::test]
async fn shell_signer_sign_failure_is_helper_failed() {
    let dir = tempfile::tempdir().unwrap();
    let helper = dir.path().join("broken.sh");
    std::fs::write(&helper, "#!/bin/sh\ncat >/dev/null\necho 'boom' >&2\nexit 1\n").unwrap();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&helper, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    let signer = ShellSigner::new(&helper);
    let err = signer.sign(b"payload").await.unwrap_err();
    assert!(matches!(err, SignError::HelperFailed(_)));
}
