// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Root settings: on-disk roots, default timeouts, and notification sink
//! configuration. Resolved from an optional TOML file, then overridden by
//! environment variables, then falling back to platform directories.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("could not determine a platform directory for {0}")]
    NoPlatformDir(&'static str),
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
struct SettingsFile {
    state_dir: Option<String>,
    cache_dir: Option<String>,
    config_dir: Option<String>,
    build_timeout_secs: Option<u64>,
    health_ttl_secs: Option<u64>,
    signing_helper: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub state_dir: PathBuf,
    pub cache_dir: PathBuf,
    pub config_dir: PathBuf,
    pub build_timeout: Duration,
    pub health_ttl: Duration,
    /// Path to the external signing helper binary, if manifest signing is
    /// configured. `None` means builds run with [`dd_adapters::NoopSigner`].
    pub signing_helper: Option<PathBuf>,
}

const DEFAULT_BUILD_TIMEOUT_SECS: u64 = 30 * 60;
const DEFAULT_HEALTH_TTL_SECS: u64 = 5 * 60;

impl Settings {
    /// Load settings from `settings_path` (if it exists), then apply
    /// `STATE_DIR`/`CACHE_DIR`/`CONFIG_DIR` environment overrides, then fall
    /// back to platform-appropriate directories.
    pub fn load(settings_path: Option<&std::path::Path>) -> Result<Self, SettingsError> {
        let file = match settings_path {
            Some(path) if path.exists() => {
                let text =
                    std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
                        path: path.display().to_string(),
                        source,
                    })?;
                toml::from_str(&text).map_err(|source| SettingsError::Parse {
                    path: path.display().to_string(),
                    source,
                })?
            }
            _ => SettingsFile::default(),
        };

        let state_dir = resolve_dir(
            "STATE_DIR",
            file.state_dir,
            dirs::data_dir().map(|d| d.join("dd")),
        )?;
        let cache_dir = resolve_dir(
            "CACHE_DIR",
            file.cache_dir,
            dirs::cache_dir().map(|d| d.join("dd")),
        )?;
        let config_dir = resolve_dir(
            "CONFIG_DIR",
            file.config_dir,
            dirs::config_dir().map(|d| d.join("dd")),
        )?;

        Ok(Self {
            state_dir,
            cache_dir,
            config_dir,
            build_timeout: Duration::from_secs(
                file.build_timeout_secs.unwrap_or(DEFAULT_BUILD_TIMEOUT_SECS),
            ),
            health_ttl: Duration::from_secs(file.health_ttl_secs.unwrap_or(DEFAULT_HEALTH_TTL_SECS)),
            signing_helper: file.signing_helper.map(PathBuf::from),
        })
    }
}

fn resolve_dir(
    env_var: &'static str,
    from_file: Option<String>,
    platform_default: Option<PathBuf>,
) -> Result<PathBuf, SettingsError> {
    if let Ok(v) = std::env::var(env_var) {
        if !v.is_empty() {
            return Ok(PathBuf::from(v));
        }
    }
    if let Some(v) = from_file {
        return Ok(PathBuf::from(v));
    }
    platform_default.ok_or(SettingsError::NoPlatformDir(env_var))
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
