// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine configuration (§6's enumerated config, formalized per
//! SPEC_FULL.md §4.8). Loaded from TOML; every field has the spec's
//! stated default so the engine runs unconfigured.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlaConfig {
    pub scan_interval_secs: u64,
    pub scan_backoff_on_error_secs: u64,
    pub default_stage_sla_hours: u32,
    pub severity_warning_cap_hours: u32,
    pub severity_critical_cap_hours: u32,
}

impl Default for SlaConfig {
    fn default() -> Self {
        Self {
            scan_interval_secs: 300,
            scan_backoff_on_error_secs: 60,
            default_stage_sla_hours: 72,
            severity_warning_cap_hours: 24,
            severity_critical_cap_hours: 72,
        }
    }
}

impl SlaConfig {
    pub fn scan_interval(&self) -> Duration {
        Duration::from_secs(self.scan_interval_secs)
    }

    pub fn scan_backoff_on_error(&self) -> Duration {
        Duration::from_secs(self.scan_backoff_on_error_secs)
    }
}

/// `[sla]`-rooted TOML document; the top-level shape the daemon loads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub sla: SlaConfig,
    /// Retention bound resolving Open Question (b): bulk progress
    /// records are evicted oldest-terminal-first once this count is
    /// exceeded, or once a record has been terminal longer than the TTL.
    pub bulk_retention: BulkRetentionConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulkRetentionConfig {
    pub max_retained_operations: usize,
    pub terminal_ttl_secs: u64,
}

impl Default for BulkRetentionConfig {
    fn default() -> Self {
        Self { max_retained_operations: 1_000, terminal_ttl_secs: 3_600 }
    }
}

impl EngineConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let config = EngineConfig::default();
        assert_eq!(config.sla.scan_interval_secs, 300);
        assert_eq!(config.sla.scan_backoff_on_error_secs, 60);
        assert_eq!(config.sla.default_stage_sla_hours, 72);
        assert_eq!(config.sla.severity_warning_cap_hours, 24);
        assert_eq!(config.sla.severity_critical_cap_hours, 72);
    }

    #[test]
    fn partial_toml_fills_in_remaining_defaults() {
        let config = EngineConfig::from_toml_str("[sla]\nscan_interval_secs = 30\n").unwrap();
        assert_eq!(config.sla.scan_interval_secs, 30);
        assert_eq!(config.sla.default_stage_sla_hours, 72);
    }
}
