//! # Application State
//!
//! This module defines the shared application state (`AppState`) and the logic
//! for building it at startup. The state only holds `Arc`s to collaborators
//! that are either stateless or synchronise internally, so concurrent uploads
//! share nothing mutable.

use crate::{
    config::{AppConfig, ConfigError, METADATA_TASK},
    cors::CorsPolicy,
};
use ielts_ingest::{
    ingest::{AiMetadataGenerator, MetadataGenerator, PdfDecoder, PdfExtractor},
    prompts::metadata::DEFAULT_METADATA_MAX_INPUT_CHARS,
    providers::{
        db::{sqlite::SqliteProvider, storage::DocumentStore},
        factory::create_provider,
    },
    UploadPipeline,
};
use ielts_ingest_pdf::PdfCrateDecoder;
use std::{path::Path, sync::Arc};
use tracing::info;

/// The shared application state, accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration.
    pub config: Arc<AppConfig>,
    /// The upload pipeline: extractor, metadata generator and store.
    pub pipeline: Arc<UploadPipeline>,
    /// The document store, for reads outside the upload path.
    pub store: Arc<dyn DocumentStore>,
    /// The cross-origin policy, parsed once.
    pub cors: Arc<CorsPolicy>,
}

impl AppState {
    /// Assembles state from already-built collaborators.
    pub fn from_components(
        config: AppConfig,
        decoder: Arc<dyn PdfDecoder>,
        metadata: Arc<dyn MetadataGenerator>,
        store: Arc<dyn DocumentStore>,
    ) -> Result<Self, ConfigError> {
        let cors = CorsPolicy::from_config(&config.cors)?;
        let pipeline = UploadPipeline::new(PdfExtractor::new(decoder), metadata, Arc::clone(&store));

        Ok(Self {
            config: Arc::new(config),
            pipeline: Arc::new(pipeline),
            store,
            cors: Arc::new(cors),
        })
    }
}

/// Builds the production application state from the configuration.
///
/// - Instantiates the AI provider named by the `metadata_generation` task.
/// - Opens the SQLite database and ensures the schema exists.
/// - Uses the `pdf`-crate decoder for extraction.
pub async fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let task = config
        .tasks
        .get(METADATA_TASK)
        .ok_or_else(|| anyhow::anyhow!("Configuration for task '{METADATA_TASK}' not found."))?;
    let provider_name = task.provider.as_deref().ok_or_else(|| {
        anyhow::anyhow!("Task '{METADATA_TASK}' is missing required 'provider' field")
    })?;
    let system_prompt = task.system_prompt.clone().ok_or_else(|| {
        anyhow::anyhow!("Task '{METADATA_TASK}' is missing required 'system_prompt' field")
    })?;
    let max_input_chars = task
        .max_input_chars
        .unwrap_or(DEFAULT_METADATA_MAX_INPUT_CHARS);

    let provider_config = config.providers.get(provider_name).ok_or_else(|| {
        anyhow::anyhow!("Provider '{provider_name}' not found in providers map.")
    })?;
    let ai_provider = create_provider(provider_name, provider_config)?;
    let metadata = AiMetadataGenerator::new(ai_provider, system_prompt, max_input_chars);

    if let Some(parent) = Path::new(&config.db_url).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let sqlite_provider = SqliteProvider::new(&config.db_url).await?;
    info!(db_path = %config.db_url, "Initialized document store (SQLite).");
    sqlite_provider.initialize_schema().await?;

    Ok(AppState::from_components(
        config,
        Arc::new(PdfCrateDecoder::new()),
        Arc::new(metadata),
        Arc::new(sqlite_provider),
    )?)
}
