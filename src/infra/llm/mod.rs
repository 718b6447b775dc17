pub mod client;

pub use client::{
    ChatCompletionsClient, CompletionBackend, FallbackReason, Generation, LlmError, SqlGenerator,
    FALLBACK_SQL,
};
