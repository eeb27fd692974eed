// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The stable JSON output envelope (§6): `{command, status, exit_code,
//! details}`, printed to standard output only. All diagnostics go through
//! `tracing` to standard error; nothing in this module ever writes there.

use clap::ValueEnum;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub command: String,
    pub status: &'static str,
    pub exit_code: i32,
    pub details: T,
}

impl<T: Serialize> Envelope<T> {
    pub fn success(command: impl Into<String>, details: T) -> Self {
        Self {
            command: command.into(),
            status: "success",
            exit_code: 0,
            details,
        }
    }

    pub fn failure(command: impl Into<String>, exit_code: i32, details: T) -> Self {
        Self {
            command: command.into(),
            status: "failure",
            exit_code,
            details,
        }
    }
}

/// Print `envelope` as pretty JSON to stdout. The only writer of this
/// module that touches stdout; everything else in the CLI prints
/// human-readable text there instead, never both in the same invocation.
pub fn print_json<T: Serialize>(envelope: &Envelope<T>) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(envelope)?);
    Ok(())
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
