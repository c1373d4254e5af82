//! crates/pdf_chat_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any web framework or PDF library.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A PDF uploaded by a user, held only as its extracted text.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: Uuid,
    pub file_name: String,
    pub text: String,
    pub total_pages: usize,
    pub created_at: DateTime<Utc>,
    pub last_accessed_at: DateTime<Utc>,
}

/// A fixed-size slice of extracted text. Not the PDF's visual page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PseudoPage {
    /// 1-based and contiguous.
    pub page_number: usize,
    pub text: String,
}

/// A reference from an assistant answer back to a pseudo-page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub page: u32,
    pub text: String,
}

impl Citation {
    pub fn for_page(page: u32) -> Self {
        Self {
            page,
            text: format!("See context on page {}", page),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Author {
    User,
    Assistant,
}

/// One turn of conversation, held in client memory only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub author: Author,
    pub text: String,
    pub citations: Vec<Citation>,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            author: Author::User,
            text: text.into(),
            citations: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(text: impl Into<String>, citations: Vec<Citation>) -> Self {
        Self {
            id: Uuid::new_v4(),
            author: Author::Assistant,
            text: text.into(),
            citations,
            timestamp: Utc::now(),
        }
    }
}

/// What the client sends alongside a question to identify the PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentRef {
    /// A document previously uploaded to this server.
    Uploaded(Uuid),
    /// A publicly reachable PDF the server fetches on every question.
    Url(String),
}

/// The backend's reply to a single question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatAnswer {
    /// Raw LLM output, citation markers included.
    pub answer: String,
    pub total_pages: usize,
}
