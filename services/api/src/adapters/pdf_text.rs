//! services/api/src/adapters/pdf_text.rs
//!
//! This module contains the adapter that turns PDF bytes into plain text.
//! It implements the `TextExtractionService` port from the `core` crate using
//! the `pdf-extract` crate.

use async_trait::async_trait;
use bytes::Bytes;
use pdf_chat_core::{
    extraction::resolve_text,
    ports::{PortError, PortResult, TextExtractionService},
};
use tracing::{debug, warn};

/// Every PDF starts with this header.
pub const PDF_MAGIC: &[u8] = b"%PDF-";

/// Returns true when the bytes carry the PDF file header.
pub fn looks_like_pdf(data: &[u8]) -> bool {
    data.starts_with(PDF_MAGIC)
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `TextExtractionService` with `pdf-extract`.
#[derive(Clone, Default)]
pub struct PdfExtractAdapter;

impl PdfExtractAdapter {
    /// Creates a new `PdfExtractAdapter`.
    pub fn new() -> Self {
        Self
    }

    /// Runs the parser synchronously. Parsing is CPU bound, so callers should
    /// keep this off the async executor.
    fn extract_blocking(data: &[u8]) -> PortResult<String> {
        let flat = match pdf_extract::extract_text_from_mem(data) {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("Flat text extraction failed, trying page by page: {}", e);
                None
            }
        };

        let needs_pages = flat.as_deref().map_or(true, |t| t.trim().is_empty());
        let pages = if needs_pages {
            match pdf_extract::extract_text_from_mem_by_pages(data) {
                Ok(pages) => Some(pages),
                Err(e) => {
                    warn!("Page-by-page extraction failed: {}", e);
                    None
                }
            }
        } else {
            None
        };

        resolve_text(flat, pages)
    }
}

//=========================================================================================
// `TextExtractionService` Trait Implementation
//=========================================================================================

#[async_trait]
impl TextExtractionService for PdfExtractAdapter {
    async fn extract_text(&self, pdf: Bytes) -> PortResult<String> {
        if !looks_like_pdf(&pdf) {
            return Err(PortError::Extraction(
                "Data does not start with a PDF header".to_string(),
            ));
        }

        let size = pdf.len();
        // A panic inside the parser surfaces here as a join error.
        let text = tokio::task::spawn_blocking(move || Self::extract_blocking(&pdf))
            .await
            .map_err(|e| PortError::Extraction(format!("PDF parser aborted: {}", e)))??;

        debug!("Extracted {} characters from a {} byte PDF.", text.len(), size);
        Ok(text)
    }
}
