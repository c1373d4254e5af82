//! crates/pdf_chat_core/src/extraction.rs
//!
//! Picks the text to use from whatever a PDF library managed to produce.

use crate::ports::{PortError, PortResult};

/// Prefers the flat text, falls back to the per-page texts joined with a space,
/// and fails when neither contains anything but whitespace.
pub fn resolve_text(flat: Option<String>, pages: Option<Vec<String>>) -> PortResult<String> {
    if let Some(text) = flat.filter(|t| !t.trim().is_empty()) {
        return Ok(text);
    }

    if let Some(pages) = pages.filter(|p| p.iter().any(|t| !t.trim().is_empty())) {
        return Ok(pages.join(" "));
    }

    Err(PortError::Extraction("No text found in PDF".to_string()))
}
