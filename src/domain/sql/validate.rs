//! Read-only policy check for candidate statements.
//!
//! This is a keyword scan over the raw text, not a SQL parser: it does not know
//! about comments, string literals or statement boundaries. A denylisted word
//! anywhere in the text rejects the statement.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// Write, DDL, DCL and procedure-call keywords. Any whole-word hit rejects.
pub const FORBIDDEN_KEYWORDS: &[&str] = &[
    "INSERT", "UPDATE", "DELETE", "DROP", "ALTER", "CREATE", "GRANT", "REVOKE", "TRUNCATE",
    "EXEC", "EXECUTE",
];

static FORBIDDEN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\b(?:{})\b", FORBIDDEN_KEYWORDS.join("|"))).unwrap()
});

static SELECT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bSELECT\b").unwrap());

/// Why a candidate was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationRejection {
    ForbiddenKeyword(String),
    MissingSelect,
}

impl fmt::Display for ValidationRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationRejection::ForbiddenKeyword(k) => write!(f, "forbidden keyword {}", k),
            ValidationRejection::MissingSelect => write!(f, "no SELECT keyword found"),
        }
    }
}

impl std::error::Error for ValidationRejection {}

/// A statement that passed [`check`]. The executor only accepts this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedStatement {
    sql: String,
}

impl ValidatedStatement {
    pub fn as_str(&self) -> &str {
        &self.sql
    }
}

impl fmt::Display for ValidatedStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

/// Applies the read-only policy and, on success, wraps the candidate.
pub fn check(candidate: &str) -> Result<ValidatedStatement, ValidationRejection> {
    if let Some(m) = FORBIDDEN_REGEX.find(candidate) {
        return Err(ValidationRejection::ForbiddenKeyword(
            m.as_str().to_ascii_uppercase(),
        ));
    }
    if !SELECT_REGEX.is_match(candidate) {
        return Err(ValidationRejection::MissingSelect);
    }
    Ok(ValidatedStatement {
        sql: candidate.to_string(),
    })
}

pub fn validate(candidate: &str) -> bool {
    check(candidate).is_ok()
}
