//! Service-level errors and their HTTP mapping.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::env::EnvError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Env(#[from] EnvError),

    #[error("malformed request: {0}")]
    BadRequest(#[from] JsonRejection),

    #[error("environment is closed")]
    Closed,
}

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::Closed => StatusCode::SERVICE_UNAVAILABLE,
            ServiceError::Env(EnvError::NotReset(_) | EnvError::EpisodeDone(_)) => StatusCode::CONFLICT,
            ServiceError::Env(_) | ServiceError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::warn!(status = %status, error = %self, "RPC failed");
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(ServiceError::Closed.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(ServiceError::from(EnvError::EpisodeDone(0)).status(), StatusCode::CONFLICT);
        assert_eq!(ServiceError::from(EnvError::NotReset(1)).status(), StatusCode::CONFLICT);
        assert_eq!(
            ServiceError::from(EnvError::ActionCount { expected: 2, actual: 1 }).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn env_errors_display_transparently() {
        let err = ServiceError::from(EnvError::EpisodeDone(3));
        assert_eq!(err.to_string(), "episode of env 3 is done; reset it before stepping");
    }
}
