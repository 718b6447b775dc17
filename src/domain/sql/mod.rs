//! Handling of untrusted SQL text: sanitizing, the read-only policy and row limits.

pub mod limit;
pub mod sanitize;
pub mod validate;

pub use limit::{enforce_limit, resolve_max_rows, MAX_ROWS_HARD_CAP};
pub use sanitize::sanitize;
pub use validate::{check, validate, ValidatedStatement, ValidationRejection, FORBIDDEN_KEYWORDS};
