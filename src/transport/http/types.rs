use crate::app::QueryService;
use crate::domain::schema::SchemaColumn;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::sync::Arc;
use utoipa::ToSchema;

pub const SERVICE_NAME: &str = "nl2sql-gateway";

/// Header carrying the shared secret.
pub const API_KEY_HEADER: &str = "x-api-key";

#[derive(Clone)]
pub struct AppState {
    pub query_service: QueryService,
    pub api_key: Arc<str>,
}

impl AppState {
    pub fn new(query_service: QueryService, api_key: &str) -> Self {
        Self {
            query_service,
            api_key: Arc::from(api_key),
        }
    }
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct GenerateRequest {
    /// The natural-language question.
    pub query: String,
    #[serde(default)]
    pub user_id: Option<String>,
    /// Row cap for the generated query. Defaults to 1000; larger values are clamped to 1000.
    #[serde(default)]
    pub max_rows: Option<i64>,
    /// Optional SQL to run instead of asking the model. It is validated like generated SQL.
    #[serde(default)]
    pub sql: Option<String>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct GenerateMetadata {
    pub elapsed_ms: u64,
    pub row_count: usize,
    /// The natural-language question echoed back.
    pub query: String,
    /// True when the model was unavailable and the fallback statement ran instead.
    pub degraded: bool,
    /// One of `model`, `fallback`, `override`.
    pub source: String,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct GenerateResponse {
    pub sql: String,
    #[schema(value_type = Vec<Object>)]
    pub rows: Vec<Map<String, JsonValue>>,
    pub columns: Vec<String>,
    pub metadata: GenerateMetadata,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: String,
    /// UNIX time in fractional seconds.
    pub timestamp: f64,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ReadyResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct SchemaResponse {
    /// Database schema name (typically `public`).
    pub schema: String,
    pub columns: Vec<SchemaColumn>,
    /// The text embedded in generation prompts.
    pub rendered: String,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    /// Machine-readable category, e.g. `validation_rejected` or `execution_error`.
    pub kind: String,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(kind: &str, error: &str) -> Self {
        Self {
            success: false,
            kind: kind.to_string(),
            error: error.to_string(),
        }
    }
}

pub fn json_422(err: JsonRejection, expected: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ErrorResponse::new(
            "invalid_body",
            &format!("Invalid JSON body: {} (expected: {})", err, expected),
        )),
    )
}
