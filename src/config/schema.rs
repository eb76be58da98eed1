//! Configuration schema definitions.
//!
//! Upstream descriptors arrive from the coordinator's own configuration.
//! All types derive Serde traits so they can also be read from a TOML file.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the upstream RPC layer.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RpcConfig {
    /// Daemon endpoints, one client each.
    pub upstreams: Vec<UpstreamConfig>,

    /// Periodic liveness probing.
    pub monitor: MonitorConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

/// A single daemon endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// Logical name used in logs and metrics.
    pub name: String,

    /// Daemon host (e.g., "127.0.0.1").
    pub host: String,

    /// Daemon RPC port.
    pub port: u16,

    /// Per-request timeout as a duration string (e.g., "10s", "500ms").
    #[serde(default = "default_timeout")]
    pub timeout: String,

    /// Count HTTP statuses outside 200..400 as health failures.
    #[serde(default = "default_status_errors_mark_sick")]
    pub status_errors_mark_sick: bool,
}

impl UpstreamConfig {
    /// Build a descriptor with default timeout and status handling.
    pub fn new(name: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            port,
            timeout: default_timeout(),
            status_errors_mark_sick: default_status_errors_mark_sick(),
        }
    }

    /// The JSON-RPC endpoint this descriptor points at.
    pub fn endpoint(&self) -> String {
        format!("http://{}:{}/json_rpc", self.host, self.port)
    }

    /// Parse the configured timeout. Zero disables the request timeout.
    pub fn request_timeout(&self) -> Result<Duration, humantime::DurationError> {
        humantime::parse_duration(self.timeout.trim())
    }
}

fn default_timeout() -> String {
    "10s".to_string()
}

fn default_status_errors_mark_sick() -> bool {
    true
}

/// Upstream monitor configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Run the periodic probe loop.
    pub enabled: bool,

    /// Probe interval as a duration string.
    pub interval: String,

    /// Reserve size passed to the block template probe.
    pub reserve_size: u32,

    /// Wallet address passed to the block template probe.
    pub wallet_address: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval: "5s".to_string(),
            reserve_size: 8,
            wallet_address: String::new(),
        }
    }
}

impl MonitorConfig {
    /// Parse the configured probe interval.
    pub fn probe_interval(&self) -> Result<Duration, humantime::DurationError> {
        humantime::parse_duration(self.interval.trim())
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log filter directive (e.g., "info", "upstream_rpc=debug").
    pub log_level: String,

    /// Emit logs as JSON lines instead of human-readable text.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_format() {
        let upstream = UpstreamConfig::new("main", "10.0.0.5", 18081);
        assert_eq!(upstream.endpoint(), "http://10.0.0.5:18081/json_rpc");
    }

    #[test]
    fn test_timeout_parsing() {
        let mut upstream = UpstreamConfig::new("main", "127.0.0.1", 18081);
        assert_eq!(upstream.request_timeout().unwrap(), Duration::from_secs(10));

        upstream.timeout = "1m 30s".into();
        assert_eq!(upstream.request_timeout().unwrap(), Duration::from_secs(90));

        upstream.timeout = "250ms".into();
        assert_eq!(upstream.request_timeout().unwrap(), Duration::from_millis(250));

        upstream.timeout = "soon".into();
        assert!(upstream.request_timeout().is_err());
    }

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let config: RpcConfig = toml::from_str(
            r#"
            [[upstreams]]
            name = "main"
            host = "127.0.0.1"
            port = 18081
            "#,
        )
        .unwrap();

        assert_eq!(config.upstreams.len(), 1);
        assert_eq!(config.upstreams[0].timeout, "10s");
        assert!(config.upstreams[0].status_errors_mark_sick);
        assert!(!config.monitor.enabled);
        assert_eq!(config.monitor.reserve_size, 8);
        assert_eq!(config.observability.log_level, "info");
    }
}
