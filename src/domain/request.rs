use crate::domain::sql::resolve_max_rows;
use crate::error::PipelineError;

/// One natural-language question, with its row budget already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub natural_language_query: String,
    pub max_rows: u32,
    pub caller_id: Option<String>,
    /// Caller-supplied SQL used instead of asking the model. Still validated.
    pub sql_override: Option<String>,
}

impl GenerationRequest {
    pub fn new(
        query: &str,
        max_rows: Option<i64>,
        caller_id: Option<String>,
    ) -> Result<Self, PipelineError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(PipelineError::InvalidRequest("query is required".to_string()));
        }
        let max_rows = resolve_max_rows(max_rows).map_err(PipelineError::InvalidRequest)?;
        Ok(Self {
            natural_language_query: query.to_string(),
            max_rows,
            caller_id,
            sql_override: None,
        })
    }

    pub fn with_sql_override(mut self, sql: Option<String>) -> Self {
        self.sql_override = sql.filter(|s| !s.trim().is_empty());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_the_hard_cap() {
        let req = GenerationRequest::new("show me invoices", None, None).unwrap();
        assert_eq!(req.max_rows, 1000);
        assert!(req.sql_override.is_none());
    }

    #[test]
    fn rejects_blank_query_and_bad_max_rows() {
        assert!(matches!(
            GenerationRequest::new("   ", None, None),
            Err(PipelineError::InvalidRequest(_))
        ));
        assert!(matches!(
            GenerationRequest::new("q", Some(0), None),
            Err(PipelineError::InvalidRequest(_))
        ));
    }

    #[test]
    fn blank_override_is_ignored() {
        let req = GenerationRequest::new("q", Some(5), Some("u1".into()))
            .unwrap()
            .with_sql_override(Some("  ".into()));
        assert!(req.sql_override.is_none());
        assert_eq!(req.max_rows, 5);
        assert_eq!(req.caller_id.as_deref(), Some("u1"));
    }
}
