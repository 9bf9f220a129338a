//! Command-line flags.
//!
//! Flags override values from the optional TOML file, which override defaults.
//! The merged result is validated at startup, not here.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::schema::{DEFAULT_HTTPS_BIND, DEFAULT_HTTP_BIND};
use crate::config::{parse_config, ConfigError, GatewayConfig, Mode, TlsConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CliMode {
    Proxy,
    Backend,
}

impl From<CliMode> for Mode {
    fn from(mode: CliMode) -> Self {
        match mode {
            CliMode::Proxy => Mode::Proxy,
            CliMode::Backend => Mode::Backend,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "rr-gateway")]
#[command(about = "Round-robin reverse proxy gateway", version)]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Run as the gateway or as a simulated backend
    #[arg(long, value_enum)]
    pub mode: Option<CliMode>,

    /// Backend URL; repeat for more backends, in rotation order
    #[arg(short, long = "backend")]
    pub backends: Vec<String>,

    /// First backend URL
    #[arg(long)]
    pub backend1: Option<String>,

    /// Second backend URL
    #[arg(long)]
    pub backend2: Option<String>,

    /// Serve over TLS
    #[arg(long)]
    pub https: bool,

    /// Certificate (PEM) used with --https
    #[arg(long)]
    pub cert: Option<String>,

    /// Private key (PEM) used with --https
    #[arg(long)]
    pub key: Option<String>,

    /// Listen address for the gateway
    #[arg(long)]
    pub bind: Option<String>,

    /// Backend instance id (backend mode)
    #[arg(long)]
    pub id: Option<u32>,

    /// Backend listen port (backend mode); derived from --id when omitted
    #[arg(long)]
    pub port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Cli {
    /// Resolve the effective configuration: file (if any), then flags.
    pub fn into_config(self) -> Result<GatewayConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => parse_config(path)?,
            None => GatewayConfig::default(),
        };
        self.apply(&mut config);
        Ok(config)
    }

    fn apply(self, config: &mut GatewayConfig) {
        if let Some(mode) = self.mode {
            config.mode = mode.into();
        }

        if !self.backends.is_empty() {
            config.backends = self.backends;
        }
        if let Some(first) = self.backend1 {
            set_or_push(&mut config.backends, 0, first);
        }
        if let Some(second) = self.backend2 {
            set_or_push(&mut config.backends, 1, second);
        }

        if self.https || self.cert.is_some() || self.key.is_some() {
            let mut tls = config.listener.tls.take().unwrap_or_default();
            if let Some(cert) = self.cert {
                tls.cert_path = cert;
            }
            if let Some(key) = self.key {
                tls.key_path = key;
            }
            config.listener.tls = Some(tls);
            if self.bind.is_none() && config.listener.bind_address == DEFAULT_HTTP_BIND {
                config.listener.bind_address = DEFAULT_HTTPS_BIND.to_string();
            }
        }
        if let Some(bind) = self.bind {
            config.listener.bind_address = bind;
        }

        if let Some(id) = self.id {
            config.simulator.instance_id = id;
        }
        if let Some(port) = self.port {
            config.simulator.port = Some(port);
        }
        if let Some(level) = self.log_level {
            config.observability.log_level = level;
        }
    }
}

fn set_or_push(backends: &mut Vec<String>, index: usize, value: String) {
    if let Some(slot) = backends.get_mut(index) {
        *slot = value;
    } else {
        backends.push(value);
    }
}
