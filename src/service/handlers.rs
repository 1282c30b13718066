//! HTTP handlers, one per RPC.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::service::error::ServiceError;
use crate::service::messages::{
    CloseResponse, EnvInfoResponse, HealthResponse, ResetRequest, ResetResponse, StepRequest,
    StepResponse,
};
use crate::service::servicer::EnvServicer;

pub async fn get_env_info(
    State(servicer): State<EnvServicer>,
) -> Result<Json<EnvInfoResponse>, ServiceError> {
    servicer.get_env_info().await.map(Json)
}

pub async fn reset(
    State(servicer): State<EnvServicer>,
    request: Result<Json<ResetRequest>, JsonRejection>,
) -> Result<Json<ResetResponse>, ServiceError> {
    let Json(request) = request?;
    servicer.reset(request).await.map(Json)
}

pub async fn step(
    State(servicer): State<EnvServicer>,
    request: Result<Json<StepRequest>, JsonRejection>,
) -> Result<Json<StepResponse>, ServiceError> {
    let Json(request) = request?;
    servicer.step(request).await.map(Json)
}

pub async fn close(State(servicer): State<EnvServicer>) -> Result<Json<CloseResponse>, ServiceError> {
    servicer.close().await.map(Json)
}

pub async fn healthz(State(servicer): State<EnvServicer>) -> Json<HealthResponse> {
    let status = if servicer.is_closed() { "closed" } else { "serving" };
    Json(HealthResponse {
        status: status.to_string(),
        env: servicer.env_name().to_string(),
        replica: servicer.replica(),
    })
}
