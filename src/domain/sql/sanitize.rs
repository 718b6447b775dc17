use once_cell::sync::Lazy;
use regex::Regex;

// Language tags models put after an opening fence. Longer names first.
const FENCE_TAGS: &str = r"(?:postgresql|postgres|pgsql|psql|sqlite|sql)";

static FENCED_BLOCK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?is)```(?:[ \t]*{}\b)?(.*?)```", FENCE_TAGS)).unwrap()
});

static FENCE_DELIMITER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"(?i)```(?:[ \t]*{}\b)?", FENCE_TAGS)).unwrap());

/// Reduces raw completion text to a single candidate SQL string.
///
/// When the text holds a complete fenced block, its inner content is kept and
/// any commentary around it is dropped. Otherwise stray fence delimiters are
/// removed. Surrounding whitespace is trimmed in both cases.
pub fn sanitize(raw: &str) -> String {
    let text = raw.trim();

    if let Some(inner) = FENCED_BLOCK_REGEX
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
    {
        return inner.to_string();
    }

    FENCE_DELIMITER_REGEX.replace_all(text, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_sql_tagged_fence() {
        let raw = "```sql\nSELECT \"Name\" FROM \"Customer\" LIMIT 5;\n```";
        assert_eq!(sanitize(raw), "SELECT \"Name\" FROM \"Customer\" LIMIT 5;");
    }

    #[test]
    fn strips_untagged_fence() {
        let raw = "  ```\nSELECT 1\n```  \n";
        assert_eq!(sanitize(raw), "SELECT 1");
    }

    #[test]
    fn uppercase_tag_on_same_line() {
        assert_eq!(sanitize("```SQL SELECT 2```"), "SELECT 2");
    }

    #[test]
    fn inner_content_is_untouched() {
        let inner = "SELECT \"a\",\n       \"b\"\nFROM \"T\"\nWHERE \"c\" = 'x  y'";
        let raw = format!("```sql\n{}\n```", inner);
        assert_eq!(sanitize(&raw), inner);
    }

    #[test]
    fn commentary_around_the_block_is_dropped() {
        let raw = "Here is the query:\n```sql\nSELECT 1\n```\nIt returns one row.";
        assert_eq!(sanitize(raw), "SELECT 1");
    }

    #[test]
    fn unterminated_fence_is_removed() {
        assert_eq!(sanitize("```sql\nSELECT * FROM \"Vendor\""), "SELECT * FROM \"Vendor\"");
    }

    #[test]
    fn plain_text_is_a_no_op_and_idempotent() {
        let plain = "SELECT * FROM \"Invoice\" LIMIT 10";
        assert_eq!(sanitize(plain), plain);

        let once = sanitize("```sql\nSELECT 1\n```");
        assert_eq!(sanitize(&once), once);
    }

    #[test]
    fn identifiers_containing_sql_survive() {
        let plain = "SELECT \"sqlite_version\" FROM \"meta\"";
        assert_eq!(sanitize(plain), plain);
    }
}
