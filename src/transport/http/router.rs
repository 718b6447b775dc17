use crate::domain::schema::SchemaColumn;
use crate::transport::http::handlers::{generate, health, schema};
use crate::transport::http::types::{
    AppState, ErrorResponse, GenerateMetadata, GenerateRequest, GenerateResponse, HealthResponse,
    ReadyResponse, SchemaResponse,
};
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        health::readiness_handler,
        generate::generate_handler,
        schema::schema_handler
    ),
    components(schemas(
        GenerateRequest,
        GenerateResponse,
        GenerateMetadata,
        HealthResponse,
        ReadyResponse,
        SchemaResponse,
        SchemaColumn,
        ErrorResponse
    ))
)]
pub struct ApiDoc;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .route("/ready", get(health::readiness_handler))
        .route("/generate", post(generate::generate_handler))
        .route("/schema", get(schema::schema_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
