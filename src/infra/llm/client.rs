// Responsible for all communication with the completion endpoint.

use crate::domain::prompt::{build_completion_request, CompletionRequest};
use crate::infra::config::LlmSettings;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;

/// Statement substituted whenever the model cannot be used.
pub const FALLBACK_SQL: &str = r#"SELECT * FROM "Invoice" LIMIT 10"#;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed completion payload: {0}")]
    Malformed(String),

    #[error("completion had no content")]
    Empty,
}

/// Anything that can answer a chat-completion request with raw text.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError>;
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI-compatible `chat/completions` client (Groq by default).
pub struct ChatCompletionsClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl ChatCompletionsClient {
    pub fn new(api_url: &str, api_key: &str, timeout: std::time::Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build LLM HTTP client: {}", e))?;
        Ok(Self {
            http,
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl CompletionBackend for ChatCompletionsClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| LlmError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let payload: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Malformed(e.to_string()))?;

        let content = payload
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::Malformed("no choices".to_string()))?
            .message
            .content
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(LlmError::Empty);
        }
        Ok(content.trim().to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// No API key configured.
    Unconfigured,
    /// The single attempt failed; holds the error text for logs.
    Failed(String),
}

/// Outcome of the generation stage. Every variant still goes through the validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generation {
    Model { raw: String },
    Fallback { reason: FallbackReason },
    Override { sql: String },
}

impl Generation {
    /// The untrusted text to sanitize and validate.
    pub fn candidate(&self) -> &str {
        match self {
            Generation::Model { raw } => raw,
            Generation::Fallback { .. } => FALLBACK_SQL,
            Generation::Override { sql } => sql,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Generation::Fallback { .. })
    }

    pub fn source(&self) -> &'static str {
        match self {
            Generation::Model { .. } => "model",
            Generation::Fallback { .. } => "fallback",
            Generation::Override { .. } => "override",
        }
    }
}

/// Turns a question plus schema text into candidate SQL, degrading to
/// [`FALLBACK_SQL`] instead of failing. One attempt per call, no retries.
#[derive(Clone)]
pub struct SqlGenerator {
    backend: Option<Arc<dyn CompletionBackend>>,
    model: String,
}

impl SqlGenerator {
    pub fn from_settings(settings: &LlmSettings) -> anyhow::Result<Self> {
        let backend: Option<Arc<dyn CompletionBackend>> = match &settings.api_key {
            Some(key) => Some(Arc::new(ChatCompletionsClient::new(
                &settings.api_url,
                key,
                settings.timeout,
            )?)),
            None => None,
        };
        Ok(Self {
            backend,
            model: settings.model.clone(),
        })
    }

    pub fn with_backend(backend: Arc<dyn CompletionBackend>, model: &str) -> Self {
        Self {
            backend: Some(backend),
            model: model.to_string(),
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            backend: None,
            model: crate::infra::config::DEFAULT_LLM_MODEL.to_string(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.backend.is_some()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn generate(&self, schema_text: &str, question: &str) -> Generation {
        let Some(backend) = &self.backend else {
            tracing::warn!("no LLM API key configured; using fallback statement");
            return Generation::Fallback {
                reason: FallbackReason::Unconfigured,
            };
        };

        let request = build_completion_request(&self.model, schema_text, question);
        match backend.complete(&request).await {
            Ok(raw) => Generation::Model { raw },
            Err(e) => {
                tracing::warn!(error = %e, "LLM call failed; using fallback statement");
                Generation::Fallback {
                    reason: FallbackReason::Failed(e.to_string()),
                }
            }
        }
    }
}
