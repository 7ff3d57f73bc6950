//! # Common Test Utilities
//!
//! - `TestApp`: spawns the real router on a random port. `spawn_with_components`
//!   wires in test doubles so tests can count collaborator calls;
//!   `spawn` builds the production state against a temporary SQLite file and an
//!   `httpmock` server standing in for the AI provider.
//! - `pdf_part` and friends build multipart bodies.

// Not every test file uses every helper.
#![allow(unused)]

use anyhow::Result;
use httpmock::MockServer;
use ielts_ingest::{
    ingest::{MetadataGenerator, PdfDecoder},
    providers::db::storage::DocumentStore,
};
use ielts_ingest_server::{
    config::{self, AppConfig},
    router,
    state::{build_app_state, AppState},
};
use axum::serve;
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use std::{fs::File, io::Write, net::SocketAddr, sync::Arc};
use tempfile::{tempdir, NamedTempFile, TempDir};
use tokio::net::TcpListener;

/// A harness for end-to-end testing of the Axum server.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub app_state: AppState,
    pub mock_server: Option<MockServer>,
    _db_file: Option<NamedTempFile>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

/// Writes `contents` as `config.yml` in a fresh directory and loads it.
pub fn load_config(contents: &str) -> Result<(AppConfig, TempDir)> {
    let config_dir = tempdir()?;
    let config_path = config_dir.path().join("config.yml");
    let mut file = File::create(&config_path)?;
    file.write_all(contents.as_bytes())?;

    let config = config::get_config(Some(config_path.to_str().unwrap()))?;
    Ok((config, config_dir))
}

fn config_yaml(db_url: &str, ai_url: &str) -> String {
    format!(
        r#"
port: 0
db_url: "{db_url}"
providers:
  default:
    provider: "local"
    api_url: "{ai_url}"
    api_key: null
    model_name: "mock-chat-model"
"#
    )
}

impl TestApp {
    /// Spawns the server with the given collaborators and a default config.
    pub async fn spawn_with_components(
        decoder: Arc<dyn PdfDecoder>,
        metadata: Arc<dyn MetadataGenerator>,
        store: Arc<dyn DocumentStore>,
    ) -> Result<Self> {
        Self::spawn_with_upload_limit(None, decoder, metadata, store).await
    }

    /// Like `spawn_with_components`, optionally overriding `max_upload_bytes`.
    pub async fn spawn_with_upload_limit(
        max_upload_bytes: Option<usize>,
        decoder: Arc<dyn PdfDecoder>,
        metadata: Arc<dyn MetadataGenerator>,
        store: Arc<dyn DocumentStore>,
    ) -> Result<Self> {
        let (mut config, _config_dir) =
            load_config(&config_yaml(":memory:", "http://127.0.0.1:9/unused"))?;
        if let Some(limit) = max_upload_bytes {
            config.max_upload_bytes = limit;
        }
        let app_state = AppState::from_components(config, decoder, metadata, store)?;
        Self::spawn_with_state(app_state).await
    }

    /// Spawns the production wiring: `pdf`-crate decoder, AI metadata via a
    /// mock OpenAI-compatible endpoint, and a temporary SQLite database.
    pub async fn spawn() -> Result<Self> {
        let mock_server = MockServer::start();
        let db_file = NamedTempFile::new()?;
        let db_path = db_file.path().to_str().unwrap().to_string();

        let (config, _config_dir) = load_config(&config_yaml(
            &db_path,
            &mock_server.url("/v1/chat/completions"),
        ))?;
        let app_state = build_app_state(config).await?;

        let mut app = Self::spawn_with_state(app_state).await?;
        app.mock_server = Some(mock_server);
        app._db_file = Some(db_file);
        Ok(app)
    }

    pub async fn spawn_with_state(app_state: AppState) -> Result<Self> {
        dotenvy::dotenv().ok();
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let address = format!("http://{addr}");

        let app = router::create_router(app_state.clone());
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        tokio::spawn(async move {
            let server = serve(listener, app).with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            });
            if let Err(e) = server.await {
                tracing::error!("[TestApp] Server error: {}", e);
            }
        });

        Ok(Self {
            address,
            client: Client::new(),
            app_state,
            mock_server: None,
            _db_file: None,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Posts a multipart form to `/upload`.
    pub async fn upload(&self, form: Form) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(self.url("/upload"))
            .multipart(form)
            .send()
            .await?)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

// --- Multipart Helpers ---

/// A `file` part with the given bytes and, optionally, a declared type.
pub fn file_form(data: Vec<u8>, file_name: &str, content_type: Option<&str>) -> Result<Form> {
    let mut part = Part::bytes(data).file_name(file_name.to_string());
    if let Some(content_type) = content_type {
        part = part.mime_str(content_type)?;
    }
    Ok(Form::new().part("file", part))
}

/// A `file` part declared as `application/pdf`.
pub fn pdf_form(data: Vec<u8>, file_name: &str) -> Result<Form> {
    file_form(data, file_name, Some("application/pdf"))
}
