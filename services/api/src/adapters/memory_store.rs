//! services/api/src/adapters/memory_store.rs
//!
//! This module contains the document store adapter, the concrete implementation
//! of the `DocumentStore` port from the `core` crate. Documents live in process
//! memory, keyed by the id handed out at upload time, so concurrent users never
//! see each other's text.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pdf_chat_core::domain::Document;
use pdf_chat_core::pagination::{page_count, WORDS_PER_PAGE};
use pdf_chat_core::ports::{DocumentStore, PortError, PortResult};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A document store that implements the `DocumentStore` port.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    documents: RwLock<HashMap<Uuid, DocumentRecord>>,
}

impl InMemoryDocumentStore {
    /// Creates a new, empty `InMemoryDocumentStore`.
    pub fn new() -> Self {
        Self::default()
    }
}

//=========================================================================================
// Stored Record Struct
//=========================================================================================

struct DocumentRecord {
    id: Uuid,
    file_name: String,
    text: String,
    total_pages: usize,
    created_at: DateTime<Utc>,
    last_accessed_at: DateTime<Utc>,
    // Monotonic clock for eviction; wall-clock time is only for display.
    last_touched: Instant,
}

impl DocumentRecord {
    fn to_domain(&self) -> Document {
        Document {
            id: self.id,
            file_name: self.file_name.clone(),
            text: self.text.clone(),
            total_pages: self.total_pages,
            created_at: self.created_at,
            last_accessed_at: self.last_accessed_at,
        }
    }

    fn touch(&mut self) {
        self.last_accessed_at = Utc::now();
        self.last_touched = Instant::now();
    }
}

//=========================================================================================
// `DocumentStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn create_document(&self, file_name: &str, text: String) -> PortResult<Document> {
        let now = Utc::now();
        let record = DocumentRecord {
            id: Uuid::new_v4(),
            file_name: file_name.to_string(),
            total_pages: page_count(&text, WORDS_PER_PAGE),
            text,
            created_at: now,
            last_accessed_at: now,
            last_touched: Instant::now(),
        };
        let document = record.to_domain();
        self.documents.write().await.insert(record.id, record);
        Ok(document)
    }

    async fn get_document(&self, document_id: Uuid) -> PortResult<Document> {
        let mut documents = self.documents.write().await;
        let record = documents
            .get_mut(&document_id)
            .ok_or_else(|| PortError::NotFound(format!("Document {} not found", document_id)))?;
        record.touch();
        Ok(record.to_domain())
    }

    async fn delete_document(&self, document_id: Uuid) -> PortResult<()> {
        self.documents
            .write()
            .await
            .remove(&document_id)
            .map(|_| ())
            .ok_or_else(|| PortError::NotFound(format!("Document {} not found", document_id)))
    }

    async fn evict_idle(&self, max_idle: Duration) -> PortResult<usize> {
        let mut documents = self.documents.write().await;
        let before = documents.len();
        documents.retain(|_, record| record.last_touched.elapsed() <= max_idle);
        Ok(before - documents.len())
    }

    async fn count(&self) -> PortResult<usize> {
        Ok(self.documents.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn documents_are_isolated_by_id() {
        let store = InMemoryDocumentStore::new();
        let a = store
            .create_document("a.pdf", "alpha ".repeat(600))
            .await
            .unwrap();
        let b = store.create_document("b.pdf", "beta".to_string()).await.unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(a.total_pages, 2);
        assert_eq!(b.total_pages, 1);
        assert_eq!(store.get_document(b.id).await.unwrap().text, "beta");
        assert_eq!(store.get_document(a.id).await.unwrap().file_name, "a.pdf");
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn deleted_documents_are_gone() {
        let store = InMemoryDocumentStore::new();
        let doc = store.create_document("a.pdf", "x".to_string()).await.unwrap();

        store.delete_document(doc.id).await.unwrap();
        assert!(matches!(
            store.get_document(doc.id).await,
            Err(PortError::NotFound(_))
        ));
        assert!(matches!(
            store.delete_document(doc.id).await,
            Err(PortError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn reads_refresh_the_access_time() {
        let store = InMemoryDocumentStore::new();
        let doc = store.create_document("a.pdf", "x".to_string()).await.unwrap();
        let fetched = store.get_document(doc.id).await.unwrap();
        assert!(fetched.last_accessed_at >= doc.last_accessed_at);
        assert_eq!(fetched.created_at, doc.created_at);
    }

    #[tokio::test]
    async fn idle_documents_are_evicted() {
        let store = InMemoryDocumentStore::new();
        store.create_document("a.pdf", "x".to_string()).await.unwrap();

        assert_eq!(store.evict_idle(Duration::from_secs(3600)).await.unwrap(), 0);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(store.evict_idle(Duration::from_millis(1)).await.unwrap(), 1);
        assert_eq!(store.count().await.unwrap(), 0);
    }
}
