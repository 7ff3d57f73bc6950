//! Test doubles shared by the workspace's integration tests: a recording AI
//! provider, call-counting stand-ins for every pipeline collaborator, and a
//! generator for real PDF fixtures.

use async_trait::async_trait;
use ielts_ingest::{
    errors::PromptError,
    ingest::{
        metadata::{MetadataError, MetadataGenerator},
        pdf::{DecodedPage, PdfDecodeError, PdfDecoder},
    },
    providers::{
        ai::AiProvider,
        db::storage::{DocumentStore, StoreError},
    },
    types::{StoredDocument, UploadedDocument},
};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// --- Mock AI Provider ---

#[derive(Clone, Debug)]
pub struct MockAiProvider {
    responses: Arc<Mutex<HashMap<String, String>>>,
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockAiProvider {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Pre-programs a response for a specific prompt.
    /// The key should be a unique substring of the system prompt.
    pub fn add_response(&self, key: &str, response: &str) {
        let mut responses = self.responses.lock().unwrap();
        responses.insert(key.to_string(), response.to_string());
    }

    /// Retrieves the recorded calls for assertion.
    pub fn get_calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockAiProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, PromptError> {
        let mut calls = self.calls.lock().unwrap();
        calls.push((system_prompt.to_string(), user_prompt.to_string()));

        let responses = self.responses.lock().unwrap();
        for (key, response) in responses.iter() {
            if system_prompt.contains(key) {
                return Ok(response.clone());
            }
        }

        Err(PromptError::AiApi(format!(
            "MockAiProvider: No response programmed for system prompt. Got: '{system_prompt}'"
        )))
    }
}

// --- Stub PDF Decoder ---

/// Returns pre-programmed pages (or an error) and counts invocations.
#[derive(Debug, Clone)]
pub struct StubDecoder {
    result: Result<Vec<DecodedPage>, String>,
    calls: Arc<AtomicUsize>,
}

impl StubDecoder {
    /// A decoder that reports the given texts as pages numbered 1..=n.
    pub fn with_pages(texts: &[&str]) -> Self {
        let pages = texts
            .iter()
            .enumerate()
            .map(|(i, text)| DecodedPage::new(*text, Some(i as u32 + 1)))
            .collect();
        Self::with_decoded(pages)
    }

    pub fn with_decoded(pages: Vec<DecodedPage>) -> Self {
        Self {
            result: Ok(pages),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            result: Err(reason.to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PdfDecoder for StubDecoder {
    fn decode(&self, _data: &[u8]) -> Result<Vec<DecodedPage>, PdfDecodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone().map_err(PdfDecodeError::Parse)
    }
}

// --- Stub Metadata Generator ---

#[derive(Debug, Clone)]
enum MetadataReply {
    Value(Value),
    Error(String),
    Panic(String),
}

#[derive(Debug, Clone)]
pub struct StubMetadataGenerator {
    reply: MetadataReply,
    calls: Arc<Mutex<Vec<String>>>,
}

impl StubMetadataGenerator {
    fn with_reply(reply: MetadataReply) -> Self {
        Self {
            reply,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn returning(value: Value) -> Self {
        Self::with_reply(MetadataReply::Value(value))
    }

    pub fn failing(reason: &str) -> Self {
        Self::with_reply(MetadataReply::Error(reason.to_string()))
    }

    /// A generator that panics with `message` on every call.
    pub fn panicking(message: &str) -> Self {
        Self::with_reply(MetadataReply::Panic(message.to_string()))
    }

    /// The texts the generator was asked to describe, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl MetadataGenerator for StubMetadataGenerator {
    async fn generate(&self, text: &str) -> Result<Value, MetadataError> {
        self.calls.lock().unwrap().push(text.to_string());
        match &self.reply {
            MetadataReply::Value(value) => Ok(value.clone()),
            MetadataReply::Error(reason) => {
                Err(MetadataError::Llm(PromptError::AiApi(reason.clone())))
            }
            MetadataReply::Panic(message) => panic!("{message}"),
        }
    }
}

// --- In-Memory Document Store ---

/// A `DocumentStore` that keeps records in memory, optionally failing every insert.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    documents: Arc<Mutex<Vec<StoredDocument>>>,
    insert_calls: Arc<AtomicUsize>,
    fail_with: Option<String>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose inserts always fail with a connection error carrying `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn insert_count(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }

    pub fn documents(&self) -> Vec<StoredDocument> {
        self.documents.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn insert_document(&self, document: &UploadedDocument) -> Result<String, StoreError> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.fail_with {
            return Err(StoreError::Connection(message.clone()));
        }

        let id = uuid::Uuid::new_v4().to_string();
        self.documents.lock().unwrap().push(StoredDocument {
            id: id.clone(),
            document: document.clone(),
        });
        Ok(id)
    }

    async fn get_document(&self, id: &str) -> Result<Option<StoredDocument>, StoreError> {
        Ok(self
            .documents
            .lock()
            .unwrap()
            .iter()
            .find(|stored| stored.id == id)
            .cloned())
    }
}

// --- Test-Specific Helpers ---
#[cfg(feature = "pdf")]
pub mod helpers {
    use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str};

    /// Generates a PDF with one page per entry in `pages`, each showing its text
    /// in Helvetica. An empty string produces a page with no text.
    pub fn generate_test_pdf(pages: &[&str]) -> Vec<u8> {
        let mut pdf = Pdf::new();

        let catalog_id = Ref::new(1);
        let page_tree_id = Ref::new(2);
        let font_id = Ref::new(3);
        let font_name = Name(b"F1");

        let page_ids: Vec<Ref> = (0..pages.len())
            .map(|i| Ref::new(4 + 2 * i as i32))
            .collect();

        pdf.catalog(catalog_id).pages(page_tree_id);
        pdf.pages(page_tree_id)
            .kids(page_ids.iter().copied())
            .count(pages.len() as i32);

        for (i, text) in pages.iter().enumerate() {
            let page_id = page_ids[i];
            let content_id = Ref::new(page_id.get() + 1);

            let mut page = pdf.page(page_id);
            page.media_box(Rect::new(0.0, 0.0, 595.0, 842.0));
            page.parent(page_tree_id);
            page.contents(content_id);
            page.resources().fonts().pair(font_name, font_id);
            page.finish();

            let mut content = Content::new();
            if !text.is_empty() {
                content.begin_text();
                content.set_font(font_name, 14.0);
                content.next_line(108.0, 734.0);
                content.show(Str(text.as_bytes()));
                content.end_text();
            }
            pdf.stream(content_id, &content.finish());
        }

        pdf.type1_font(font_id).base_font(Name(b"Helvetica"));

        pdf.finish()
    }
}
