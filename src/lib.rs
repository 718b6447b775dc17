pub mod app;
pub mod domain;
pub mod error;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::{PipelineOutcome, QueryService};
pub use domain::sql::{check, sanitize, validate, ValidatedStatement};
pub use domain::{GenerationRequest, ResultSet, SchemaDescription};
pub use error::PipelineError;
pub use infra::llm::{Generation, SqlGenerator, FALLBACK_SQL};
