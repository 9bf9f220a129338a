//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Plaintext listener address used when no bind address is configured.
pub const DEFAULT_HTTP_BIND: &str = "0.0.0.0:8000";

/// Encrypted listener address used when TLS is enabled without an explicit bind.
pub const DEFAULT_HTTPS_BIND: &str = "0.0.0.0:4443";

/// Default certificate location, relative to the working directory.
pub const DEFAULT_CERT_PATH: &str = "certs/server.crt";

/// Default private key location, relative to the working directory.
pub const DEFAULT_KEY_PATH: &str = "certs/server.key";

/// Which role the process plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Round-robin reverse proxy in front of the configured backends.
    #[default]
    Proxy,
    /// Simulated backend instance answering with its identity.
    Backend,
}

/// Root configuration for the gateway process.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Process role.
    pub mode: Mode,

    /// Ordered list of upstream backend URLs.
    pub backends: Vec<String>,

    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// Outbound client settings.
    pub upstream: UpstreamConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Settings used when running as a simulated backend.
    pub simulator: SimulatorConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Proxy,
            backends: vec![
                "http://localhost:8080".to_string(),
                "http://localhost:8081".to_string(),
            ],
            listener: ListenerConfig::default(),
            upstream: UpstreamConfig::default(),
            observability: ObservabilityConfig::default(),
            simulator: SimulatorConfig::default(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,

    /// Optional TLS configuration. Plaintext when absent.
    pub tls: Option<TlsConfig>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_HTTP_BIND.to_string(),
            tls: None,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            cert_path: DEFAULT_CERT_PATH.to_string(),
            key_path: DEFAULT_KEY_PATH.to_string(),
        }
    }
}

/// Outbound client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// How long an idle pooled connection is kept, in seconds.
    pub pool_idle_timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30,
            pool_idle_timeout_secs: 90,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Simulated backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Instance identifier reported in responses.
    pub instance_id: u32,

    /// Listen port. Derived from the instance id when absent.
    pub port: Option<u16>,

    /// Interface to bind.
    pub bind_host: String,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            instance_id: 1,
            port: None,
            bind_host: "0.0.0.0".to_string(),
        }
    }
}

impl SimulatorConfig {
    /// Port this instance listens on. Instance 2 gets 8081, everyone else 8080.
    pub fn effective_port(&self) -> u16 {
        self.port
            .unwrap_or(if self.instance_id == 2 { 8081 } else { 8080 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_ports() {
        let config = GatewayConfig::default();
        assert_eq!(config.mode, Mode::Proxy);
        assert_eq!(config.listener.bind_address, "0.0.0.0:8000");
        assert_eq!(
            config.backends,
            vec!["http://localhost:8080", "http://localhost:8081"]
        );
        assert!(config.listener.tls.is_none());
    }

    #[test]
    fn simulator_port_follows_instance_id() {
        let mut sim = SimulatorConfig::default();
        assert_eq!(sim.effective_port(), 8080);
        sim.instance_id = 2;
        assert_eq!(sim.effective_port(), 8081);
        sim.instance_id = 7;
        assert_eq!(sim.effective_port(), 8080);
        sim.port = Some(9001);
        assert_eq!(sim.effective_port(), 9001);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: GatewayConfig = toml::from_str(
            r#"
            backends = ["http://10.0.0.1:9000"]

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.backends, vec!["http://10.0.0.1:9000"]);
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(config.observability.log_level, "info");
        assert_eq!(config.upstream.connect_timeout_secs, 30);
    }
}
