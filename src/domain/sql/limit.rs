/// Hard ceiling on rows any single request may return.
pub const MAX_ROWS_HARD_CAP: u32 = 1000;

/// Resolves the caller's `max_rows`: absent means the cap, larger values are
/// clamped to the cap, zero or negative values are refused.
pub fn resolve_max_rows(requested: Option<i64>) -> Result<u32, String> {
    match requested {
        None => Ok(MAX_ROWS_HARD_CAP),
        Some(n) if n <= 0 => Err(format!("max_rows must be a positive integer, got {}", n)),
        Some(n) => Ok(n.min(MAX_ROWS_HARD_CAP as i64) as u32),
    }
}

/// Appends `LIMIT <max_rows>` when the statement has no `LIMIT` anywhere.
///
/// The check is a case-insensitive substring test, so a statement that already
/// says `LIMIT 5000` (or merely mentions the word) keeps its own bound and is
/// not held to `MAX_ROWS_HARD_CAP`. A trailing `;` terminator is replaced by the
/// appended clause, which goes on its own line so a trailing `--` comment
/// cannot swallow it.
pub fn enforce_limit(sql: &str, max_rows: u32) -> String {
    if sql.to_uppercase().contains("LIMIT") {
        return sql.to_string();
    }

    let max_rows = max_rows.clamp(1, MAX_ROWS_HARD_CAP);
    let body = sql.trim_end().trim_end_matches(|c: char| c == ';' || c.is_whitespace());
    format!("{}\nLIMIT {};", body, max_rows)
}
