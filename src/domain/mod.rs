//! Request-scoped types and the pure stages of the pipeline.

pub mod prompt;
pub mod request;
pub mod result;
pub mod schema;
pub mod sql;

pub use request::GenerationRequest;
pub use result::{CellValue, ResultSet};
pub use schema::{SchemaColumn, SchemaDescription};
