//! crates/pdf_chat_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like PDF libraries or APIs.

use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;
use uuid::Uuid;

use crate::domain::{ChatAnswer, Document, DocumentRef};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., PDF parser, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Could not extract text from PDF: {0}")]
    Extraction(String),
    #[error("Upstream service failed: {0}")]
    Upstream(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait TextExtractionService: Send + Sync {
    /// Extracts the full text of a PDF as a single string.
    async fn extract_text(&self, pdf: Bytes) -> PortResult<String>;
}

#[async_trait]
pub trait PdfFetchService: Send + Sync {
    /// Downloads a PDF from a public URL.
    async fn fetch_pdf(&self, url: &str) -> PortResult<Bytes>;
}

#[async_trait]
pub trait QuestionAnsweringService: Send + Sync {
    /// Sends a fully assembled prompt to the LLM and returns its raw answer.
    async fn answer(&self, prompt: &str) -> PortResult<String>;
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn create_document(&self, file_name: &str, text: String) -> PortResult<Document>;

    /// Fetches a document and marks it as recently used.
    async fn get_document(&self, document_id: Uuid) -> PortResult<Document>;

    async fn delete_document(&self, document_id: Uuid) -> PortResult<()>;

    /// Drops every document not accessed within `max_idle`. Returns how many were dropped.
    async fn evict_idle(&self, max_idle: Duration) -> PortResult<usize>;

    async fn count(&self) -> PortResult<usize>;
}

/// The client's view of the backend: one question in, one raw answer out.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn ask(&self, question: &str, document: &DocumentRef) -> PortResult<ChatAnswer>;

    /// Tells the backend the user closed the document.
    async fn discard(&self, document_id: Uuid) -> PortResult<()>;
}
