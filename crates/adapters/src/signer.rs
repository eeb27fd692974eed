// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The signing contract: the orchestrator only ever consumes `sign`/`verify`,
//! never the signing subsystem's internals. [`ShellSigner`] shells out to an
//! external signing helper so this crate never links a cryptographic
//! identity stack of its own.

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::subprocess::SIGN_TIMEOUT;

#[derive(Debug, Error)]
pub enum SignError {
    #[error("signing helper failed: {0}")]
    HelperFailed(String),
    #[error("signing key unreadable or wrong permissions: {0}")]
    PermissionDenied(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature(pub Vec<u8>);

#[async_trait]
pub trait Signer: Send + Sync {
    async fn sign(&self, bytes: &[u8]) -> Result<Signature, SignError>;
    async fn verify(&self, bytes: &[u8], signature: &Signature) -> Result<bool, SignError>;
    /// Whether a usable signing key is configured and readable, for `status`.
    fn is_configured(&self) -> bool;
}

/// No-op signer: `sign` returns an empty signature, `verify` always
/// succeeds. Used when no signing helper is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSigner;

#[async_trait]
impl Signer for NoopSigner {
    async fn sign(&self, _bytes: &[u8]) -> Result<Signature, SignError> {
        Ok(Signature(Vec::new()))
    }

    async fn verify(&self, _bytes: &[u8], _signature: &Signature) -> Result<bool, SignError> {
        Ok(true)
    }

    fn is_configured(&self) -> bool {
        false
    }
}

/// Shells out to an external signing helper binary: `<helper> sign` reads
/// bytes on stdin and writes a detached signature to stdout; `<helper>
/// verify <sig-path>` reads the original bytes on stdin and exits zero iff
/// the signature is valid.
pub struct ShellSigner {
    helper_path: std::path::PathBuf,
}

impl ShellSigner {
    pub fn new(helper_path: impl Into<std::path::PathBuf>) -> Self {
        Self {
            helper_path: helper_path.into(),
        }
    }
}

#[async_trait]
impl Signer for ShellSigner {
    async fn sign(&self, bytes: &[u8]) -> Result<Signature, SignError> {
        use std::process::Stdio;

        let mut cmd = Command::new(&self.helper_path);
        cmd.arg("sign").stdin(Stdio::piped()).stdout(Stdio::piped()).stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|e| SignError::HelperFailed(e.to_string()))?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(bytes)
                .await
                .map_err(|e| SignError::HelperFailed(e.to_string()))?;
        }

        let output = tokio::time::timeout(SIGN_TIMEOUT, child.wait_with_output())
            .await
            .map_err(|_| SignError::HelperFailed("signing helper timed out".to_string()))?
            .map_err(|e| SignError::HelperFailed(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            if stderr.contains("permission denied") {
                return Err(SignError::PermissionDenied(stderr));
            }
            return Err(SignError::HelperFailed(stderr));
        }

        Ok(Signature(output.stdout))
    }

    async fn verify(&self, bytes: &[u8], signature: &Signature) -> Result<bool, SignError> {
        use std::process::Stdio;

        let sig_file = tempfile_for_signature(signature)?;

        let mut cmd = Command::new(&self.helper_path);
        cmd.arg("verify")
            .arg(sig_file.path())
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|e| SignError::HelperFailed(e.to_string()))?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(bytes)
                .await
                .map_err(|e| SignError::HelperFailed(e.to_string()))?;
        }

        let status = tokio::time::timeout(SIGN_TIMEOUT, child.wait())
            .await
            .map_err(|_| SignError::HelperFailed("verify helper timed out".to_string()))?
            .map_err(|e| SignError::HelperFailed(e.to_string()))?;

        Ok(status.success())
    }

    fn is_configured(&self) -> bool {
        self.helper_path.exists()
    }
}

fn tempfile_for_signature(signature: &Signature) -> Result<tempfile::NamedTempFile, SignError> {
    use std::io::Write;
    let mut file = tempfile::NamedTempFile::new().map_err(|e| SignError::HelperFailed(e.to_string()))?;
    file.write_all(&signature.0)
        .map_err(|e| SignError::HelperFailed(e.to_string()))?;
    Ok(file)
}

#[cfg(test)]
#[path = "signer_tests.rs"]
mod tests;
