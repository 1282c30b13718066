//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (batch size, resize dimensions, timeouts)
//! - Check that the listener is secured unless explicitly told otherwise
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before the environment is constructed

use thiserror::Error;

use crate::config::schema::ServiceConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("env.batch_size must be at least 1")]
    ZeroBatchSize,

    #[error("env.max_timestep must be at least 1")]
    ZeroMaxTimestep,

    #[error("resize requires non-zero dimensions, got {height}x{width}")]
    ZeroResizeDimensions { height: u32, width: u32 },

    #[error("timeouts.request_secs must be at least 1")]
    ZeroRequestTimeout,

    #[error("listener.tls.{0} must not be empty")]
    EmptyTlsPath(&'static str),

    #[error("listener has no TLS material; pass a certificate and key or run with --insecure")]
    MissingTls,
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.env.batch_size == 0 {
        errors.push(ValidationError::ZeroBatchSize);
    }
    if config.env.max_timestep == Some(0) {
        errors.push(ValidationError::ZeroMaxTimestep);
    }
    if config.env.resize && (config.env.resized_height == 0 || config.env.resized_width == 0) {
        errors.push(ValidationError::ZeroResizeDimensions {
            height: config.env.resized_height,
            width: config.env.resized_width,
        });
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    match &config.listener.tls {
        Some(tls) => {
            if tls.cert_path.trim().is_empty() {
                errors.push(ValidationError::EmptyTlsPath("cert_path"));
            }
            if tls.key_path.trim().is_empty() {
                errors.push(ValidationError::EmptyTlsPath("key_path"));
            }
        }
        None if !config.listener.insecure => errors.push(ValidationError::MissingTls),
        None => {}
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
