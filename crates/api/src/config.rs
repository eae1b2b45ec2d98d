//! Server configuration, read from `REMIT_*` environment variables.

use std::net::{AddrParseError, SocketAddr};

use thiserror::Error;

use remit_infra::LedgerConfig;
use remit_observability::{LogFormat, UnknownLogFormat};

pub const BIND_ADDR: &str = "REMIT_BIND_ADDR";
pub const LOG_FORMAT: &str = "REMIT_LOG_FORMAT";
pub const SEED_DEMO_DATA: &str = "REMIT_SEED_DEMO_DATA";
pub const ENABLE_DEMO_ENDPOINT: &str = "REMIT_ENABLE_DEMO_ENDPOINT";
pub const RETAIN_REJECTED_TRANSACTIONS: &str = "REMIT_RETAIN_REJECTED_TRANSACTIONS";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key}: invalid socket address `{value}`: {source}")]
    BindAddr {
        key: &'static str,
        value: String,
        #[source]
        source: AddrParseError,
    },

    #[error("{key}: {source}")]
    LogFormat {
        key: &'static str,
        #[source]
        source: UnknownLogFormat,
    },

    #[error("{key}: expected a boolean (true/false/1/0/yes/no), got `{value}`")]
    Bool { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub log_format: LogFormat,
    /// Seed demo users, accounts and transactions before serving.
    pub seed_demo_data: bool,
    /// Expose `POST /demo-data`.
    pub demo_endpoint: bool,
    pub ledger: LedgerConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            log_format: LogFormat::default(),
            seed_demo_data: false,
            demo_endpoint: true,
            ledger: LedgerConfig::default(),
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Unset or blank variables
    /// fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let raw_addr = var(BIND_ADDR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr
            .trim()
            .parse()
            .map_err(|source| ConfigError::BindAddr {
                key: BIND_ADDR,
                value: raw_addr.clone(),
                source,
            })?;

        let log_format = match var(LOG_FORMAT) {
            Some(raw) => raw.parse().map_err(|source| ConfigError::LogFormat {
                key: LOG_FORMAT,
                source,
            })?,
            None => defaults.log_format,
        };

        let flag = |key: &'static str, default: bool| match var(key) {
            Some(raw) => parse_bool(key, &raw),
            None => Ok(default),
        };

        Ok(Self {
            bind_addr,
            log_format,
            seed_demo_data: flag(SEED_DEMO_DATA, defaults.seed_demo_data)?,
            demo_endpoint: flag(ENABLE_DEMO_ENDPOINT, defaults.demo_endpoint)?,
            ledger: LedgerConfig {
                retain_rejected_transactions: flag(
                    RETAIN_REJECTED_TRANSACTIONS,
                    defaults.ledger.retain_rejected_transactions,
                )?,
            },
        })
    }
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::Bool {
            key,
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = from_pairs(&[]).unwrap();
        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:8080");
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(!config.seed_demo_data);
        assert!(config.demo_endpoint);
        assert!(config.ledger.retain_rejected_transactions);
    }

    #[test]
    fn reads_every_variable() {
        let config = from_pairs(&[
            (BIND_ADDR, "127.0.0.1:9000"),
            (LOG_FORMAT, "pretty"),
            (SEED_DEMO_DATA, "YES"),
            (ENABLE_DEMO_ENDPOINT, "0"),
            (RETAIN_REJECTED_TRANSACTIONS, "false"),
        ])
        .unwrap();
        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.seed_demo_data);
        assert!(!config.demo_endpoint);
        assert!(!config.ledger.retain_rejected_transactions);
    }

    #[test]
    fn rejects_malformed_values() {
        assert!(matches!(
            from_pairs(&[(BIND_ADDR, "localhost")]),
            Err(ConfigError::BindAddr { .. })
        ));
        assert!(matches!(
            from_pairs(&[(LOG_FORMAT, "xml")]),
            Err(ConfigError::LogFormat { .. })
        ));
        assert!(matches!(
            from_pairs(&[(SEED_DEMO_DATA, "maybe")]),
            Err(ConfigError::Bool { key: SEED_DEMO_DATA, .. })
        ));
    }
}
