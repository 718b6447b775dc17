//! Prompt construction for SQL generation.

use serde::{Deserialize, Serialize};

pub const SYSTEM_MESSAGE: &str =
    "You are a SQL expert. Generate only valid PostgreSQL SELECT queries.";

/// Low temperature keeps the model close to deterministic output.
pub const TEMPERATURE: f32 = 0.1;
pub const MAX_TOKENS: u32 = 500;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: &str) -> Self {
        Self {
            role: "system".to_string(),
            content: content.to_string(),
        }
    }

    pub fn user(content: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: content.to_string(),
        }
    }
}

/// Body of an OpenAI-compatible `chat/completions` call.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Renders the user prompt: schema, read-only rules, then the question.
pub fn render_user_prompt(schema_text: &str, question: &str) -> String {
    format!(
        r#"You are a SQL expert. Given the following PostgreSQL database schema and a natural language query, generate a valid SQL SELECT query.

{schema}

Important rules:
1. ONLY generate SELECT queries. Never use INSERT, UPDATE, DELETE, DROP, ALTER, CREATE, or GRANT.
2. Use double quotes for table and column names (PostgreSQL convention).
3. Always include a LIMIT clause (max {cap} rows).
4. Return ONLY the SQL query, no explanations or markdown.
5. For date comparisons, use PostgreSQL date functions.

Natural language query: {question}

SQL query:"#,
        schema = schema_text,
        cap = crate::domain::sql::MAX_ROWS_HARD_CAP,
        question = question,
    )
}

pub fn build_completion_request(model: &str, schema_text: &str, question: &str) -> CompletionRequest {
    CompletionRequest {
        model: model.to_string(),
        messages: vec![
            ChatMessage::system(SYSTEM_MESSAGE),
            ChatMessage::user(&render_user_prompt(schema_text, question)),
        ],
        temperature: TEMPERATURE,
        max_tokens: MAX_TOKENS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_schema_rules_and_question() {
        let prompt = render_user_prompt("Database Schema:\n\n\nTable: Invoice\n", "total spend by vendor");
        assert!(prompt.contains("Table: Invoice"));
        assert!(prompt.contains("ONLY generate SELECT queries"));
        assert!(prompt.contains("max 1000 rows"));
        assert!(prompt.contains("double quotes"));
        assert!(prompt.contains("no explanations"));
        assert!(prompt.ends_with("Natural language query: total spend by vendor\n\nSQL query:"));
    }

    #[test]
    fn completion_request_shape() {
        let req = build_completion_request("some-model", "schema", "question");
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["model"], "some-model");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], SYSTEM_MESSAGE);
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["max_tokens"], 500);
        let temp = body["temperature"].as_f64().unwrap();
        assert!((temp - 0.1).abs() < 1e-6);
    }
}
