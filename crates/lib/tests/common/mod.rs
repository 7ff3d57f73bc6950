#![allow(dead_code)]
//! # Common Test Utilities
//!
//! Shared tracing setup plus small, deterministic stand-ins for the pipeline's
//! collaborators.

use async_trait::async_trait;
use dotenvy::dotenv;
use ielts_ingest::{
    ingest::{DecodedPage, PdfDecodeError, PdfDecoder},
    providers::ai::AiProvider,
    PromptError,
};
use std::sync::{Arc, Once, RwLock};

static INIT: Once = Once::new();

/// Initializes the tracing subscriber and loads .env for tests.
pub fn setup_tracing() {
    INIT.call_once(|| {
        dotenv().ok();
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();
    });
}

// --- Mock AI Provider ---

/// Replays canned responses in order and records every prompt pair.
#[derive(Clone, Debug)]
pub struct MockAiProvider {
    pub call_history: Arc<RwLock<Vec<(String, String)>>>,
    pub responses: Arc<RwLock<Vec<String>>>,
}

impl MockAiProvider {
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            call_history: Arc::new(RwLock::new(Vec::new())),
            responses: Arc::new(RwLock::new(responses.into_iter().rev().collect())),
        }
    }

    pub fn call_count(&self) -> usize {
        self.call_history.read().unwrap().len()
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, PromptError> {
        self.call_history
            .write()
            .unwrap()
            .push((system_prompt.to_string(), user_prompt.to_string()));
        self.responses
            .write()
            .unwrap()
            .pop()
            .ok_or_else(|| PromptError::AiApi("MockAiProvider ran out of responses".to_string()))
    }
}

// --- Fixed PDF Decoder ---

/// Returns the same pages for every input.
#[derive(Debug, Clone)]
pub struct FixedDecoder(pub Vec<DecodedPage>);

impl FixedDecoder {
    pub fn pages(texts: &[&str]) -> Self {
        Self(
            texts
                .iter()
                .enumerate()
                .map(|(i, text)| DecodedPage::new(*text, Some(i as u32 + 1)))
                .collect(),
        )
    }
}

impl PdfDecoder for FixedDecoder {
    fn decode(&self, _data: &[u8]) -> Result<Vec<DecodedPage>, PdfDecodeError> {
        Ok(self.0.clone())
    }
}
