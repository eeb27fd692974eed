// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Host health probing and the concurrency-aware host selector.

pub mod health;
pub mod selector;

pub use health::{HealthError, HealthProbe, HealthRecord};
pub use selector::{Candidate, HostSelector, SelectorError};
