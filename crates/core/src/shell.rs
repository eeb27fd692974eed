// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shell-quoting helpers for values interpolated into remote commands.

/// Escape a string for safe use inside a single-quoted shell context.
///
/// Single quotes in the value are replaced with `'\''` (end quote, escaped
/// literal quote, start quote), the standard idiom for embedding a single
/// quote inside a single-quoted string.
pub fn escape_for_shell(s: &str) -> String {
    s.replace('\'', "'\\''")
}
