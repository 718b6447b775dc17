// src/bin/api_server.rs

use nl2sql_gateway::infra::config::Settings;
use nl2sql_gateway::infra::logging::init_logging;
use nl2sql_gateway::transport;
use nl2sql_gateway::QueryService;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env()?;
    init_logging(transport::http::types::SERVICE_NAME);

    // --- Service Initialization ---
    tracing::info!("initializing QueryService");
    let query_service = QueryService::connect(&settings).await?;
    if query_service.generator().is_configured() {
        tracing::info!(model = query_service.generator().model(), "LLM generation enabled");
    } else {
        tracing::warn!("no LLM API key configured; every request will run the fallback statement");
    }

    let app_state = transport::http::AppState::new(query_service.clone(), &settings.service_api_key);

    // --- API Server Initialization ---
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);
    let app = transport::http::create_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()))
        .layer(cors);
    let listener = tokio::net::TcpListener::bind(&settings.bind_addr).await?;
    tracing::info!("API server listening on http://{}", settings.bind_addr);
    tracing::info!("Swagger UI available at /swagger-ui");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for shutdown signal");
            }
            tracing::info!("shutdown signal received");
        })
        .await?;

    query_service.close().await;
    tracing::info!("graceful shutdown complete");
    Ok(())
}
