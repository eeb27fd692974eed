// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! What the build strategy resolver decided to do with a (tool, target) pair.
//!
//! Serializes to/from a tagged string: `"act:job"`, `"native:host"`, `"skip:reason"`.
//! This is a small, self-contained record kept separate from the full
//! `BuildStrategy` so logging and golden-file assertions stay stable even
//! as the strategy's configuration payload grows.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BuildMethod {
    Act(String),
    Native(String),
    Skip(String),
}

impl BuildMethod {
    pub fn act(job: impl Into<String>) -> Self {
        BuildMethod::Act(job.into())
    }

    pub fn native(host: impl Into<String>) -> Self {
        BuildMethod::Native(host.into())
    }

    pub fn skip(reason: impl Into<String>) -> Self {
        BuildMethod::Skip(reason.into())
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, BuildMethod::Skip(_))
    }

    /// The method name used in manifests (`"act"` or `"native"`); `None` for skipped targets.
    pub fn method_name(&self) -> Option<&'static str> {
        match self {
            BuildMethod::Act(_) => Some("act"),
            BuildMethod::Native(_) => Some("native"),
            BuildMethod::Skip(_) => None,
        }
    }
}

impl fmt::Display for BuildMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildMethod::Act(job) => write!(f, "act:{job}"),
            BuildMethod::Native(host) => write!(f, "native:{host}"),
            BuildMethod::Skip(reason) => write!(f, "skip:{reason}"),
        }
    }
}

impl FromStr for BuildMethod {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(job) = s.strip_prefix("act:") {
            Ok(BuildMethod::Act(job.to_string()))
        } else if let Some(host) = s.strip_prefix("native:") {
            Ok(BuildMethod::Native(host.to_string()))
        } else if let Some(reason) = s.strip_prefix("skip:") {
            Ok(BuildMethod::Skip(reason.to_string()))
        } else {
            Ok(BuildMethod::Skip(s.to_string()))
        }
    }
}

impl Serialize for BuildMethod {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for BuildMethod {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        match s.parse::<Self>() {
            Ok(method) => Ok(method),
            Err(infallible) => match infallible {},
        }
    }
}

#[cfg(test)]
#[path = "strategy_tests.rs"]
mod tests;
