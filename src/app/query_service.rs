//! The question-to-rows pipeline.
//!
//! This module sits between the HTTP gateway and the database. Per request it:
//! 1.  Introspects the configured namespace and renders it for the prompt.
//! 2.  Asks the model for SQL (or degrades to the fallback statement).
//! 3.  Sanitizes and validates the candidate; nothing unvalidated is executed.
//! 4.  Executes with the row cap and normalizes the result.

use crate::domain::request::GenerationRequest;
use crate::domain::result::ResultSet;
use crate::domain::schema::SchemaDescription;
use crate::domain::sql::{check, sanitize};
use crate::error::PipelineError;
use crate::infra::config::Settings;
use crate::infra::llm::{Generation, SqlGenerator};
use crate::storage;
use sqlx::PgPool;
use std::time::{Duration, Instant};
use tracing::Instrument;

/// Everything one successful run produced.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    /// Validated statement as generated, before the row cap was applied.
    pub sql: String,
    pub result: ResultSet,
    pub generation: Generation,
    pub elapsed: Duration,
}

/// Owns the connection pool and the SQL generator.
#[derive(Clone)]
pub struct QueryService {
    pool: PgPool,
    generator: SqlGenerator,
    namespace: String,
}

impl QueryService {
    pub fn new(pool: PgPool, generator: SqlGenerator, namespace: &str) -> Self {
        Self {
            pool,
            generator,
            namespace: namespace.to_string(),
        }
    }

    /// Connects the pool and builds the generator from `settings`.
    pub async fn connect(settings: &Settings) -> anyhow::Result<Self> {
        let pool = storage::connect_pool(&settings.database_url, &settings.pool).await?;
        let generator = SqlGenerator::from_settings(&settings.llm)?;
        Ok(Self::new(pool, generator, &settings.schema_namespace))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn generator(&self) -> &SqlGenerator {
        &self.generator
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub async fn describe_schema(&self) -> Result<SchemaDescription, PipelineError> {
        storage::introspect(&self.pool, &self.namespace).await
    }

    /// Round trip used by readiness checks.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await.map(|_| ())
    }

    /// Closes the pool; waits for checked-out connections to come back.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("database pool closed");
    }

    pub async fn run(&self, request: &GenerationRequest) -> Result<PipelineOutcome, PipelineError> {
        let span = tracing::info_span!(
            "generate",
            caller = request.caller_id.as_deref().unwrap_or("-"),
            max_rows = request.max_rows
        );
        self.run_inner(request).instrument(span).await
    }

    async fn run_inner(&self, request: &GenerationRequest) -> Result<PipelineOutcome, PipelineError> {
        let started = Instant::now();

        let generation = match &request.sql_override {
            Some(sql) => Generation::Override { sql: sql.clone() },
            None => {
                let schema = self.describe_schema().await?;
                self.generator
                    .generate(&schema.render(), &request.natural_language_query)
                    .await
            }
        };
        tracing::debug!(source = generation.source(), "candidate generated");

        let candidate = sanitize(generation.candidate());
        let statement = check(&candidate).map_err(|rejection| {
            tracing::warn!(%rejection, sql = %candidate, "candidate rejected");
            PipelineError::ValidationRejected(rejection)
        })?;

        let result = storage::execute(&self.pool, &statement, request.max_rows).await?;

        let elapsed = started.elapsed();
        tracing::info!(
            rows = result.row_count(),
            elapsed_ms = elapsed.as_millis() as u64,
            degraded = generation.is_degraded(),
            "query completed"
        );

        Ok(PipelineOutcome {
            sql: statement.as_str().to_string(),
            result,
            generation,
            elapsed,
        })
    }
}
