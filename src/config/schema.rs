//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the env service.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the env service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (port, TLS).
    pub listener: ListenerConfig,

    /// Environment construction options.
    pub env: EnvConfig,

    /// Per-replica runtime settings.
    pub runtime: RuntimeConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request size limits.
    pub security: SecurityConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl ServiceConfig {
    /// Output directory of this replica: the base directory joined with the replica index.
    pub fn output_dir(&self) -> PathBuf {
        self.runtime.output_dir.join(self.runtime.replica.to_string())
    }

    /// Address the service binds to, on all interfaces.
    pub fn bind_address(&self) -> String {
        format!("[::]:{}", self.listener.port)
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Port on which to run.
    pub port: u16,

    /// TLS material. Required unless `insecure` is set.
    pub tls: Option<TlsConfig>,

    /// Serve plaintext HTTP. Meant for local testing only.
    pub insecure: bool,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            port: 7777,
            tls: None,
            insecure: false,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// Options handed to the environment factory.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EnvConfig {
    /// Registered name of the environment to make (e.g. "CartPole-v0").
    pub name: Option<String>,

    /// Number of independent environments served side by side.
    pub batch_size: usize,

    /// Maximum number of time-steps in a trajectory. Overrides the registry default.
    pub max_timestep: Option<u64>,

    /// Resize image observations.
    pub resize: bool,

    /// Resized height of the frame.
    pub resized_height: u32,

    /// Resized width of the frame.
    pub resized_width: u32,

    /// Clip rewards to [-1, 1] and round them.
    pub clip_rewards: bool,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            name: None,
            batch_size: 1,
            max_timestep: None,
            resize: false,
            resized_height: 105,
            resized_width: 80,
            clip_rewards: true,
        }
    }
}

/// Replica-level settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Base output directory, shared by all replicas.
    pub output_dir: PathBuf,

    /// Index of this replica; namespaces the output directory.
    pub replica: u32,

    /// Whether the replica runs next to a TPU. Reported only.
    pub use_tpu: bool,

    /// Whether the replica runs as a packaged experiment. Reported only.
    pub xm: bool,
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_flag_defaults() {
        let config = ServiceConfig::default();
        assert_eq!(config.listener.port, 7777);
        assert_eq!(config.env.batch_size, 1);
        assert_eq!(config.env.resized_height, 105);
        assert_eq!(config.env.resized_width, 80);
        assert!(config.env.clip_rewards);
        assert!(!config.env.resize);
        assert_eq!(config.runtime.replica, 0);
    }

    #[test]
    fn output_dir_joins_replica() {
        let mut config = ServiceConfig::default();
        assert_eq!(config.output_dir(), PathBuf::from("0"));

        config.runtime.output_dir = PathBuf::from("/tmp/out");
        config.runtime.replica = 3;
        assert_eq!(config.output_dir(), PathBuf::from("/tmp/out/3"));
    }

    #[test]
    fn bind_address_uses_port_verbatim() {
        let mut config = ServiceConfig::default();
        assert_eq!(config.bind_address(), "[::]:7777");

        config.listener.port = 50051;
        assert_eq!(config.bind_address(), "[::]:50051");
    }

    #[test]
    fn minimal_toml_fills_defaults() {
        let config: ServiceConfig = toml::from_str(
            r#"
            [env]
            name = "CartPole-v0"
            max_timestep = 50
            "#,
        )
        .unwrap();
        assert_eq!(config.env.name.as_deref(), Some("CartPole-v0"));
        assert_eq!(config.env.max_timestep, Some(50));
        assert_eq!(config.listener.port, 7777);
        assert!(config.env.clip_rewards);
    }
}
