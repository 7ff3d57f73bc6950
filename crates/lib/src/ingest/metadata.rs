//! # Metadata Generation
//!
//! Turns the extracted plain text of an uploaded PDF into a structured JSON
//! object (title, sections, detected question types, ...) by asking an AI
//! provider. The result is stored verbatim as `file_metadata`.

use crate::{errors::PromptError, providers::ai::AiProvider};
use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("LLM processing failed: {0}")]
    Llm(#[from] PromptError),
    #[error("Failed to parse LLM response as JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("LLM response was valid JSON but not an object")]
    NotAnObject,
}

/// Produces the opaque `file_metadata` object for a document's text.
#[async_trait]
pub trait MetadataGenerator: Send + Sync + Debug {
    async fn generate(&self, text: &str) -> Result<Value, MetadataError>;
}

/// A `MetadataGenerator` backed by a chat-style AI provider.
#[derive(Debug)]
pub struct AiMetadataGenerator {
    ai_provider: Box<dyn AiProvider>,
    system_prompt: String,
    max_input_chars: usize,
}

impl AiMetadataGenerator {
    pub fn new(
        ai_provider: Box<dyn AiProvider>,
        system_prompt: impl Into<String>,
        max_input_chars: usize,
    ) -> Self {
        Self {
            ai_provider,
            system_prompt: system_prompt.into(),
            max_input_chars,
        }
    }
}

#[async_trait]
impl MetadataGenerator for AiMetadataGenerator {
    async fn generate(&self, text: &str) -> Result<Value, MetadataError> {
        let input = truncate_chars(text, self.max_input_chars);
        info!(
            input_chars = input.chars().count(),
            "Requesting structured metadata from AI provider."
        );

        let response = self
            .ai_provider
            .generate(&self.system_prompt, input)
            .await?;
        debug!(response = %response, "Received metadata response.");

        parse_json_object(&response)
    }
}

/// Returns the longest prefix of `text` with at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// Parses an LLM reply as a JSON object, tolerating a ```json fence.
pub fn parse_json_object(response: &str) -> Result<Value, MetadataError> {
    let cleaned = response
        .trim()
        .strip_prefix("```json")
        .or_else(|| response.trim().strip_prefix("```"))
        .and_then(|s| s.trim_end().strip_suffix("```"))
        .unwrap_or(response)
        .trim();

    let value: Value = serde_json::from_str(cleaned)?;
    if value.is_object() {
        Ok(value)
    } else {
        Err(MetadataError::NotAnObject)
    }
}
