//! crates/pdf_chat_core/src/pipeline.rs
//!
//! The server side of one chat turn: paginate the document, assemble the
//! prompt, ask the LLM, and hand back its answer verbatim.

use tracing::{debug, info};

use crate::domain::ChatAnswer;
use crate::pagination::{paginate, WORDS_PER_PAGE};
use crate::ports::{PortResult, QuestionAnsweringService};
use crate::prompt::{build_prompt, DEFAULT_CHAR_BUDGET};

/// Tunables for a single answer.
#[derive(Debug, Clone, Copy)]
pub struct AnswerOptions {
    pub words_per_page: usize,
    pub char_budget: usize,
}

impl Default for AnswerOptions {
    fn default() -> Self {
        Self {
            words_per_page: WORDS_PER_PAGE,
            char_budget: DEFAULT_CHAR_BUDGET,
        }
    }
}

/// Answers `question` about `text` with a single LLM call.
pub async fn answer_question(
    qa: &dyn QuestionAnsweringService,
    text: &str,
    question: &str,
    options: AnswerOptions,
) -> PortResult<ChatAnswer> {
    let pages = paginate(text, options.words_per_page);
    let prompt = build_prompt(&pages, question, options.char_budget);
    debug!(
        "Built prompt of {} characters from {} pseudo-pages.",
        prompt.chars().count(),
        pages.len()
    );

    let answer = qa.answer(&prompt).await?;
    info!("AI answer generated ({} pseudo-pages).", pages.len());

    Ok(ChatAnswer {
        answer,
        total_pages: pages.len(),
    })
}
