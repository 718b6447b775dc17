use crate::transport::http::types::{AppState, HealthResponse, ReadyResponse, SERVICE_NAME};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Process is up", body = HealthResponse))
)]
pub async fn healthcheck_handler() -> impl IntoResponse {
    let timestamp = chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0;
    Json(HealthResponse {
        ok: true,
        service: SERVICE_NAME.to_string(),
        timestamp,
    })
}

#[utoipa::path(
    get,
    path = "/ready",
    responses(
        (status = 200, description = "Database reachable", body = ReadyResponse),
        (status = 503, description = "Database unreachable", body = ReadyResponse)
    )
)]
pub async fn readiness_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.query_service.ping().await {
        Ok(()) => (StatusCode::OK, Json(ReadyResponse { ok: true, error: None })),
        Err(e) => {
            tracing::warn!(error = %e, "readiness ping failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadyResponse {
                    ok: false,
                    error: Some("database unreachable".to_string()),
                }),
            )
        }
    }
}
