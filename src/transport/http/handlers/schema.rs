use crate::transport::http::handlers::common::{error_response, require_api_key};
use crate::transport::http::types::{AppState, ErrorResponse, SchemaResponse};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    get,
    path = "/schema",
    params(("X-API-Key" = String, Header, description = "Shared secret")),
    responses(
        (status = 200, description = "Columns the model is shown", body = SchemaResponse),
        (status = 401, description = "Invalid or missing API key", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn schema_handler(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    if let Err(e) = require_api_key(&state, &headers) {
        return error_response(e);
    }

    match state.query_service.describe_schema().await {
        Ok(description) => {
            let rendered = description.render();
            (
                StatusCode::OK,
                Json(SchemaResponse {
                    schema: state.query_service.namespace().to_string(),
                    columns: description.into_columns(),
                    rendered,
                }),
            )
                .into_response()
        }
        Err(e) => error_response(e),
    }
}
