//! Command-line flags.
//!
//! Flags override the configuration file field by field. Anything not given on
//! the command line keeps the file value, or the schema default when no file
//! is supplied.

use std::path::PathBuf;

use clap::Parser;

use crate::config::loader::{read_config, ConfigError};
use crate::config::schema::{ServiceConfig, TlsConfig};
use crate::config::validation::validate_config;

#[derive(Debug, Parser)]
#[command(name = "env-service")]
#[command(about = "Serve a reinforcement-learning environment over a secure RPC endpoint", long_about = None)]
pub struct Cli {
    /// TOML configuration file; flags take precedence over its values.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Port on which to run.
    #[arg(long)]
    pub env_service_port: Option<u16>,

    /// Name of the environment to make.
    #[arg(long)]
    pub env_problem_name: Option<String>,

    /// Maximum number of time-steps in a trajectory.
    #[arg(long)]
    pub max_timestep: Option<u64>,

    /// Resize the game frame.
    #[arg(long)]
    pub resize: bool,

    /// Resized height of the game frame.
    #[arg(long)]
    pub resized_height: Option<u32>,

    /// Resized width of the game frame.
    #[arg(long)]
    pub resized_width: Option<u32>,

    /// Number of environments served by this replica.
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Base output directory.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Replica index, appended to the output directory.
    #[arg(long)]
    pub replica: Option<u32>,

    /// Whether to clip and discretize the rewards.
    #[arg(long)]
    pub clip_rewards: Option<bool>,

    /// Whether we're running on TPU.
    #[arg(long)]
    pub use_tpu: bool,

    /// Running as a packaged experiment.
    #[arg(long)]
    pub xm: bool,

    /// TLS certificate (PEM).
    #[arg(long, requires = "tls_key")]
    pub tls_cert: Option<String>,

    /// TLS private key (PEM).
    #[arg(long, requires = "tls_cert")]
    pub tls_key: Option<String>,

    /// Serve plaintext HTTP instead of TLS.
    #[arg(long)]
    pub insecure: bool,

    /// Log level used when RUST_LOG is not set.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Expose Prometheus metrics on this address.
    #[arg(long)]
    pub metrics: Option<String>,
}

impl Cli {
    /// Resolve the final configuration: file (or defaults), then flags, then validation.
    pub fn into_config(self) -> Result<ServiceConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => ServiceConfig::default(),
        };
        self.apply(&mut config);
        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }

    fn apply(self, config: &mut ServiceConfig) {
        if let Some(port) = self.env_service_port {
            config.listener.port = port;
        }
        if let (Some(cert_path), Some(key_path)) = (self.tls_cert, self.tls_key) {
            config.listener.tls = Some(TlsConfig { cert_path, key_path });
        }
        if self.insecure {
            config.listener.insecure = true;
        }

        if let Some(name) = self.env_problem_name {
            config.env.name = Some(name);
        }
        if let Some(max_timestep) = self.max_timestep {
            config.env.max_timestep = Some(max_timestep);
        }
        if self.resize {
            config.env.resize = true;
        }
        if let Some(height) = self.resized_height {
            config.env.resized_height = height;
        }
        if let Some(width) = self.resized_width {
            config.env.resized_width = width;
        }
        if let Some(batch_size) = self.batch_size {
            config.env.batch_size = batch_size;
        }
        if let Some(clip) = self.clip_rewards {
            config.env.clip_rewards = clip;
        }

        if let Some(dir) = self.output_dir {
            config.runtime.output_dir = dir;
        }
        if let Some(replica) = self.replica {
            config.runtime.replica = replica;
        }
        if self.use_tpu {
            config.runtime.use_tpu = true;
        }
        if self.xm {
            config.runtime.xm = true;
        }

        if let Some(level) = self.log_level {
            config.observability.log_level = level;
        }
        if let Some(address) = self.metrics {
            config.observability.metrics_enabled = true;
            config.observability.metrics_address = address;
        }
    }
}
