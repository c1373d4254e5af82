//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use pdf_chat_core::{
    pagination::WORDS_PER_PAGE,
    pipeline::AnswerOptions,
    ports::{DocumentStore, PdfFetchService, QuestionAnsweringService, TextExtractionService},
};
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub config: Arc<Config>,
    pub extractor: Arc<dyn TextExtractionService>,
    pub fetcher: Arc<dyn PdfFetchService>,
    pub qa_adapter: Arc<dyn QuestionAnsweringService>,
}

impl AppState {
    /// Pagination and prompt settings for one answer.
    pub fn answer_options(&self) -> AnswerOptions {
        AnswerOptions {
            words_per_page: WORDS_PER_PAGE,
            char_budget: self.config.prompt_char_budget,
        }
    }
}
