//! Schema introspection from `information_schema`.

use crate::domain::schema::{SchemaColumn, SchemaDescription};
use crate::error::PipelineError;
use sqlx::{PgPool, Row};

// Ordered by table first: rendering groups columns under headers in one pass.
const SCHEMA_QUERY: &str = "
    SELECT
        table_name::text AS table_name,
        column_name::text AS column_name,
        data_type::text AS data_type
    FROM information_schema.columns
    WHERE table_schema = $1
    ORDER BY table_name, ordinal_position";

/// Reads the columns of `namespace` on one pooled connection.
///
/// All rows are fetched before anything is built, so a failure never yields a
/// partially described table.
pub async fn introspect(pool: &PgPool, namespace: &str) -> Result<SchemaDescription, PipelineError> {
    let mut conn = pool.acquire().await.map_err(|e| {
        PipelineError::SystemFault(anyhow::anyhow!("Failed to acquire connection for introspection: {}", e))
    })?;

    let rows = sqlx::query(SCHEMA_QUERY)
        .bind(namespace)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| PipelineError::SystemFault(anyhow::anyhow!("Schema query failed: {}", e)))?;

    let mut columns = Vec::with_capacity(rows.len());
    for row in rows {
        let read = |name: &str| -> Result<String, PipelineError> {
            row.try_get::<String, _>(name).map_err(|e| {
                PipelineError::SystemFault(anyhow::anyhow!("Schema row missing '{}': {}", name, e))
            })
        };
        columns.push(SchemaColumn {
            table_name: read("table_name")?,
            column_name: read("column_name")?,
            data_type: read("data_type")?,
        });
    }

    tracing::debug!(namespace, columns = columns.len(), "schema introspected");
    Ok(SchemaDescription::new(columns))
}
