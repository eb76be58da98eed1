//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (ports non-zero, durations parseable)
//! - Detect duplicate upstream names
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RpcConfig → Result<(), Vec<ValidationError>>

use std::collections::HashSet;

use thiserror::Error;

use crate::config::schema::RpcConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("upstream #{index} has an empty name")]
    EmptyName { index: usize },

    #[error("upstream '{name}' has an empty host")]
    EmptyHost { name: String },

    #[error("upstream '{name}' has port 0")]
    ZeroPort { name: String },

    #[error("upstream '{name}' has invalid timeout '{value}'")]
    InvalidTimeout { name: String, value: String },

    #[error("upstream name '{name}' is used more than once")]
    DuplicateName { name: String },

    #[error("monitor interval '{value}' is invalid")]
    InvalidInterval { value: String },

    #[error("monitor is enabled but no wallet address is set")]
    MissingWalletAddress,
}

/// Check the configuration, collecting every error found.
pub fn validate_config(config: &RpcConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (index, upstream) in config.upstreams.iter().enumerate() {
        if upstream.name.trim().is_empty() {
            errors.push(ValidationError::EmptyName { index });
        } else if !seen.insert(upstream.name.as_str()) {
            errors.push(ValidationError::DuplicateName {
                name: upstream.name.clone(),
            });
        }

        if upstream.host.trim().is_empty() {
            errors.push(ValidationError::EmptyHost {
                name: upstream.name.clone(),
            });
        }

        if upstream.port == 0 {
            errors.push(ValidationError::ZeroPort {
                name: upstream.name.clone(),
            });
        }

        if upstream.request_timeout().is_err() {
            errors.push(ValidationError::InvalidTimeout {
                name: upstream.name.clone(),
                value: upstream.timeout.clone(),
            });
        }
    }

    if config.monitor.enabled {
        match config.monitor.probe_interval() {
            Ok(interval) if !interval.is_zero() => {}
            _ => errors.push(ValidationError::InvalidInterval {
                value: config.monitor.interval.clone(),
            }),
        }

        if config.monitor.wallet_address.trim().is_empty() {
            errors.push(ValidationError::MissingWalletAddress);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::UpstreamConfig;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&RpcConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut bad = UpstreamConfig::new("a", "", 0);
        bad.timeout = "forever".into();

        let config = RpcConfig {
            upstreams: vec![bad, UpstreamConfig::new("a", "127.0.0.1", 18081)],
            ..Default::default()
        };

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::EmptyHost { name: "a".into() }));
        assert!(errors.contains(&ValidationError::ZeroPort { name: "a".into() }));
        assert!(errors.contains(&ValidationError::InvalidTimeout {
            name: "a".into(),
            value: "forever".into(),
        }));
        assert!(errors.contains(&ValidationError::DuplicateName { name: "a".into() }));
    }

    #[test]
    fn test_enabled_monitor_requires_address_and_interval() {
        let mut config = RpcConfig::default();
        config.monitor.enabled = true;
        config.monitor.interval = "0s".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::InvalidInterval { value: "0s".into() },
                ValidationError::MissingWalletAddress,
            ]
        );
    }
}
