use crate::error::PipelineError;
use crate::transport::http::types::{AppState, ErrorResponse, API_KEY_HEADER};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Checks the shared-secret header before any pipeline work happens.
pub fn require_api_key(state: &AppState, headers: &HeaderMap) -> Result<(), PipelineError> {
    let provided = headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if provided.is_empty() || provided != &*state.api_key {
        return Err(PipelineError::Unauthorized);
    }
    Ok(())
}

pub fn status_for(err: &PipelineError) -> StatusCode {
    match err {
        PipelineError::Unauthorized => StatusCode::UNAUTHORIZED,
        PipelineError::InvalidRequest(_)
        | PipelineError::ValidationRejected(_)
        | PipelineError::Execution(_) => StatusCode::BAD_REQUEST,
        PipelineError::SystemFault(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Maps a pipeline failure to its HTTP response.
///
/// System faults are logged in full and answered with a generic message.
pub fn error_response(err: PipelineError) -> Response {
    let status = status_for(&err);
    let message = match &err {
        PipelineError::SystemFault(inner) => {
            tracing::error!(error = %format!("{:#}", inner), "request failed");
            "Query generation failed".to_string()
        }
        other => other.to_string(),
    };
    (status, Json(ErrorResponse::new(err.kind(), &message))).into_response()
}
