// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon-only settings layered on top of `ats_engine::EngineConfig`
//! (SPEC_FULL.md §4.8).

use std::path::PathBuf;

use ats_engine::EngineConfig;
use thiserror::Error;

/// Settings the engine config itself doesn't carry: where to find it,
/// and the default `tracing-subscriber` filter directive.
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub log_level: String,
    pub engine_config_path: Option<PathBuf>,
}

impl DaemonConfig {
    /// `ATS_LOG_LEVEL` seeds the `EnvFilter` default directive (`RUST_LOG`
    /// still takes precedence at init time); `ATS_CONFIG_PATH` points at
    /// the engine's TOML file. Both are optional.
    pub fn from_env() -> Self {
        Self {
            log_level: std::env::var("ATS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            engine_config_path: std::env::var("ATS_CONFIG_PATH").ok().map(PathBuf::from),
        }
    }

    /// Load the engine config from `engine_config_path`, or defaults
    /// matching spec.md §6 if unset.
    pub fn load_engine_config(&self) -> Result<EngineConfig, ConfigError> {
        let Some(path) = &self.engine_config_path else {
            return Ok(EngineConfig::default());
        };
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(path.clone(), e))?;
        Ok(EngineConfig::from_toml_str(&contents)?)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read engine config at {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),
    #[error("failed to parse engine config: {0}")]
    Toml(#[from] toml::de::Error),
}
