// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::unwrap_used))]

//! External collaborator adapters: notification sinks and the manifest
//! signing contract.

pub mod notify;
pub mod signer;
pub mod subprocess;

pub use notify::{Dedup, NotificationCenter, NotifyError, NotifyEvent, NotifySink};
pub use signer::{NoopSigner, ShellSigner, SignError, Signature, Signer};

#[cfg(any(test, feature = "test-support"))]
pub use notify::FakeSink;
