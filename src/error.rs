use thiserror::Error;

/// Failure categories of one `/generate` pipeline run.
///
/// LLM failures never show up here: they degrade to the fallback statement
/// (see [`crate::infra::llm::Generation`]).
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid or missing API key")]
    Unauthorized,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Generated SQL contains forbidden operations. Only SELECT queries are allowed. ({0})")]
    ValidationRejected(#[from] crate::domain::sql::ValidationRejection),

    #[error("SQL execution error: {0}")]
    Execution(String),

    #[error("Internal error: {0:#}")]
    SystemFault(anyhow::Error),
}

impl PipelineError {
    /// Stable machine-readable category used on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Unauthorized => "unauthorized",
            PipelineError::InvalidRequest(_) => "invalid_request",
            PipelineError::ValidationRejected(_) => "validation_rejected",
            PipelineError::Execution(_) => "execution_error",
            PipelineError::SystemFault(_) => "system_fault",
        }
    }

    /// Sorts a driver error into "the statement is bad" vs "the service is unhealthy".
    pub fn from_sqlx(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db) => PipelineError::Execution(db.message().to_string()),
            sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::Decode(_)
            | sqlx::Error::TypeNotFound { .. }
            | sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::ColumnIndexOutOfBounds { .. } => {
                PipelineError::Execution(err.to_string())
            }
            other => PipelineError::SystemFault(anyhow::Error::new(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_timeout_is_a_system_fault() {
        let err = PipelineError::from_sqlx(sqlx::Error::PoolTimedOut);
        assert_eq!(err.kind(), "system_fault");
    }

    #[test]
    fn decode_problems_are_execution_errors() {
        let err = PipelineError::from_sqlx(sqlx::Error::ColumnNotFound("x".into()));
        assert_eq!(err.kind(), "execution_error");
    }

    #[test]
    fn validation_message_names_forbidden_operations() {
        let rejection = crate::domain::sql::check("DROP TABLE x").unwrap_err();
        let err = PipelineError::from(rejection);
        assert!(err.to_string().contains("forbidden operations"));
        assert_eq!(err.kind(), "validation_rejected");
    }
}
