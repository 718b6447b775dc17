use crate::domain::request::GenerationRequest;
use crate::transport::http::handlers::common::{error_response, require_api_key};
use crate::transport::http::types::{
    json_422, AppState, ErrorResponse, GenerateMetadata, GenerateRequest, GenerateResponse,
};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    post,
    path = "/generate",
    request_body = GenerateRequest,
    params(("X-API-Key" = String, Header, description = "Shared secret")),
    responses(
        (status = 200, description = "SQL generated, validated and executed", body = GenerateResponse),
        (status = 400, description = "Invalid request, forbidden operations or SQL execution error", body = ErrorResponse),
        (status = 401, description = "Invalid or missing API key", body = ErrorResponse),
        (status = 422, description = "Malformed JSON body", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn generate_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<GenerateRequest>, JsonRejection>,
) -> impl IntoResponse {
    if let Err(e) = require_api_key(&state, &headers) {
        return error_response(e);
    }

    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => {
            return json_422(e, "{ query: string, user_id?: string, max_rows?: integer, sql?: string }")
                .into_response()
        }
    };

    let request = match GenerationRequest::new(&body.query, body.max_rows, body.user_id) {
        Ok(r) => r.with_sql_override(body.sql),
        Err(e) => return error_response(e),
    };

    match state.query_service.run(&request).await {
        Ok(outcome) => {
            let rows = outcome.result.rows_as_json();
            let response = GenerateResponse {
                sql: outcome.sql,
                metadata: GenerateMetadata {
                    elapsed_ms: outcome.elapsed.as_millis() as u64,
                    row_count: rows.len(),
                    query: request.natural_language_query.clone(),
                    degraded: outcome.generation.is_degraded(),
                    source: outcome.generation.source().to_string(),
                },
                rows,
                columns: outcome.result.columns,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response(e),
    }
}
