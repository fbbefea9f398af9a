// 8.0 config.rs: simulator settings in one place. gateway, signer count, mock jitter.
// 8.1 no config file. defaults, named presets, or environment overrides.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const DEFAULT_GATEWAY_URL: &str = "https://oracle-gateway-1.a.redstone.finance";
pub const DEFAULT_DATA_SERVICE_ID: &str = "redstone-primary-prod";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    // Base URL of the data-package gateway
    pub gateway_url: String,
    // Data service whose signers we read
    pub data_service_id: String,
    // Signed packages to take per live fetch
    pub signer_count: usize,
    // HTTP timeout for the live fetch
    pub request_timeout_secs: u64,
    // Mock jitter bound in basis points (10 = ±0.1%)
    pub mock_jitter_bps: u32,
    // Session event log cap
    pub max_events: usize,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
            data_service_id: DEFAULT_DATA_SERVICE_ID.to_string(),
            signer_count: 3,
            request_timeout_secs: 10,
            mock_jitter_bps: 10,
            max_events: 10_000,
        }
    }
}

impl SimulatorConfig {
    // Deterministic settings for tests: no jitter, small event log
    pub fn deterministic() -> Self {
        Self {
            mock_jitter_bps: 0,
            max_events: 100,
            ..Self::default()
        }
    }

    // Slow networks: longer timeout, fewer signers to wait on
    pub fn patient() -> Self {
        Self {
            signer_count: 2,
            request_timeout_secs: 30,
            ..Self::default()
        }
    }

    /// Defaults overridden by any `ORACLE_*` variables that are set and parse.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            gateway_url: lookup("ORACLE_GATEWAY_URL").unwrap_or(defaults.gateway_url),
            data_service_id: lookup("ORACLE_DATA_SERVICE_ID").unwrap_or(defaults.data_service_id),
            signer_count: parsed(&lookup, "ORACLE_SIGNER_COUNT")
                .filter(|n: &usize| *n > 0)
                .unwrap_or(defaults.signer_count),
            request_timeout_secs: parsed(&lookup, "ORACLE_TIMEOUT_SECS").unwrap_or(defaults.request_timeout_secs),
            mock_jitter_bps: parsed(&lookup, "ORACLE_MOCK_JITTER_BPS").unwrap_or(defaults.mock_jitter_bps),
            max_events: parsed(&lookup, "ORACLE_MAX_EVENTS").unwrap_or(defaults.max_events),
        }
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|v| v.trim().parse().ok())
}
