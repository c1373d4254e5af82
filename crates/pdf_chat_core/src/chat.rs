//! crates/pdf_chat_core/src/chat.rs
//!
//! The client side of the conversation: the transcript and the per-turn state
//! machine (idle → awaiting a response → answer or apology rendered).

use tracing::{info, warn};
use uuid::Uuid;

use crate::citations::extract_citations;
use crate::domain::{ChatAnswer, ChatMessage, DocumentRef};
use crate::ports::{ChatBackend, PortResult};

/// Shown in place of an answer when the round trip fails for any reason.
pub const APOLOGY_MESSAGE: &str =
    "Sorry, I encountered an error while processing your question. Please try again.";

/// Shown when the backend answers with nothing.
pub const NO_ANSWER_MESSAGE: &str = "No answer received.";

/// Why a send was refused before any network call was made.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SendRejected {
    #[error("The question is empty")]
    EmptyQuestion,
    #[error("A question is already awaiting its answer")]
    RequestInFlight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    Idle,
    AwaitingResponse,
}

/// A question that has been rendered optimistically and still needs its answer.
#[derive(Debug)]
#[must_use = "a pending turn must be completed or the conversation stays busy"]
pub struct PendingTurn {
    pub message_id: Uuid,
    pub question: String,
}

/// A chat about one document.
#[derive(Debug)]
pub struct Conversation<B> {
    backend: B,
    document: DocumentRef,
    messages: Vec<ChatMessage>,
    phase: TurnPhase,
    total_pages: Option<usize>,
}

impl<B: ChatBackend> Conversation<B> {
    pub fn new(backend: B, document: DocumentRef) -> Self {
        Self {
            backend,
            document,
            messages: Vec::new(),
            phase: TurnPhase::Idle,
            total_pages: None,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn document(&self) -> &DocumentRef {
        &self.document
    }

    /// Pseudo-page count reported by the last successful answer.
    pub fn total_pages(&self) -> Option<usize> {
        self.total_pages
    }

    /// Validates the input and renders the user's message.
    pub fn begin_turn(&mut self, input: &str) -> Result<PendingTurn, SendRejected> {
        if input.trim().is_empty() {
            return Err(SendRejected::EmptyQuestion);
        }
        if self.phase == TurnPhase::AwaitingResponse {
            return Err(SendRejected::RequestInFlight);
        }

        let message = ChatMessage::user(input);
        let pending = PendingTurn {
            message_id: message.id,
            question: input.trim().to_string(),
        };
        self.messages.push(message);
        self.phase = TurnPhase::AwaitingResponse;
        Ok(pending)
    }

    /// Renders the outcome of a pending turn and returns to idle.
    pub fn complete_turn(
        &mut self,
        pending: PendingTurn,
        result: PortResult<ChatAnswer>,
    ) -> &ChatMessage {
        let reply = match result {
            Ok(answer) => {
                self.total_pages = Some(answer.total_pages);
                let raw = if answer.answer.trim().is_empty() {
                    NO_ANSWER_MESSAGE
                } else {
                    answer.answer.as_str()
                };
                let cited = extract_citations(raw);
                ChatMessage::assistant(cited.text, cited.citations)
            }
            Err(e) => {
                warn!(
                    "Chat request for message {} failed: {}",
                    pending.message_id, e
                );
                ChatMessage::assistant(APOLOGY_MESSAGE, Vec::new())
            }
        };

        self.phase = TurnPhase::Idle;
        self.messages.push(reply);
        &self.messages[self.messages.len() - 1]
    }

    /// Sends one question and renders whatever comes back.
    pub async fn send(&mut self, input: &str) -> Result<&ChatMessage, SendRejected> {
        let pending = self.begin_turn(input)?;
        let result = self.backend.ask(&pending.question, &self.document).await;
        Ok(self.complete_turn(pending, result))
    }

    /// Drops the transcript and, for uploaded documents, asks the server to forget the text.
    pub async fn close(&mut self) {
        self.messages.clear();
        self.phase = TurnPhase::Idle;
        self.total_pages = None;

        if let DocumentRef::Uploaded(document_id) = self.document {
            match self.backend.discard(document_id).await {
                Ok(()) => info!("Discarded document {}.", document_id),
                Err(e) => warn!("Failed to discard document {}: {}", document_id, e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Author;
    use crate::ports::PortError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct StubBackend {
        asks: AtomicUsize,
        discards: AtomicUsize,
        replies: Mutex<Vec<PortResult<ChatAnswer>>>,
    }

    impl StubBackend {
        fn replying(replies: Vec<PortResult<ChatAnswer>>) -> Self {
            Self {
                replies: Mutex::new(replies),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl ChatBackend for StubBackend {
        async fn ask(&self, _question: &str, _document: &DocumentRef) -> PortResult<ChatAnswer> {
            self.asks.fetch_add(1, Ordering::SeqCst);
            self.replies.lock().unwrap().remove(0)
        }

        async fn discard(&self, _document_id: Uuid) -> PortResult<()> {
            self.discards.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn answer(text: &str, total_pages: usize) -> PortResult<ChatAnswer> {
        Ok(ChatAnswer {
            answer: text.to_string(),
            total_pages,
        })
    }

    #[tokio::test]
    async fn blank_questions_never_reach_the_backend() {
        let mut chat = Conversation::new(
            StubBackend::default(),
            DocumentRef::Url("https://x/a.pdf".into()),
        );

        assert_eq!(chat.send("").await.unwrap_err(), SendRejected::EmptyQuestion);
        assert_eq!(chat.send("  \n\t").await.unwrap_err(), SendRejected::EmptyQuestion);
        assert_eq!(chat.backend().asks.load(Ordering::SeqCst), 0);
        assert!(chat.messages().is_empty());
    }

    #[tokio::test]
    async fn answer_is_rendered_with_citations() {
        let backend = StubBackend::replying(vec![answer("Yes [Page 2] and [Page 2].", 4)]);
        let mut chat = Conversation::new(backend, DocumentRef::Uploaded(Uuid::new_v4()));

        let reply = chat.send("Is it there?").await.unwrap().clone();

        assert_eq!(reply.author, Author::Assistant);
        assert_eq!(reply.text, "Yes and .");
        assert_eq!(reply.citations.len(), 1);
        assert_eq!(reply.citations[0].page, 2);
        assert_eq!(chat.messages().len(), 2);
        assert_eq!(chat.messages()[0].author, Author::User);
        assert_eq!(chat.total_pages(), Some(4));
        assert_eq!(chat.phase(), TurnPhase::Idle);
    }

    #[tokio::test]
    async fn second_send_while_awaiting_is_rejected() {
        let mut chat =
            Conversation::new(StubBackend::default(), DocumentRef::Uploaded(Uuid::new_v4()));

        let pending = chat.begin_turn("first").unwrap();
        assert_eq!(chat.phase(), TurnPhase::AwaitingResponse);
        assert_eq!(
            chat.send("second").await.unwrap_err(),
            SendRejected::RequestInFlight
        );
        assert_eq!(chat.backend().asks.load(Ordering::SeqCst), 0);

        chat.complete_turn(pending, answer("done", 1));
        assert_eq!(chat.phase(), TurnPhase::Idle);
        assert_eq!(chat.messages().len(), 2);
    }

    #[tokio::test]
    async fn failure_renders_the_apology_and_allows_resending() {
        let backend = StubBackend::replying(vec![
            Err(PortError::Upstream("timeout".into())),
            answer("", 1),
        ]);
        let mut chat = Conversation::new(backend, DocumentRef::Uploaded(Uuid::new_v4()));

        let reply = chat.send("why?").await.unwrap();
        assert_eq!(reply.text, APOLOGY_MESSAGE);
        assert!(reply.citations.is_empty());

        let reply = chat.send("why?").await.unwrap();
        assert_eq!(reply.text, NO_ANSWER_MESSAGE);
        assert_eq!(chat.backend().asks.load(Ordering::SeqCst), 2);
        assert_eq!(chat.messages().len(), 4);
    }

    #[tokio::test]
    async fn close_clears_transcript_and_discards_uploads_only() {
        let backend = StubBackend::replying(vec![answer("ok", 1)]);
        let mut chat = Conversation::new(backend, DocumentRef::Uploaded(Uuid::new_v4()));
        chat.send("hi").await.unwrap();

        chat.close().await;
        assert!(chat.messages().is_empty());
        assert_eq!(chat.total_pages(), None);
        assert_eq!(chat.backend().discards.load(Ordering::SeqCst), 1);

        let mut by_url = Conversation::new(
            StubBackend::default(),
            DocumentRef::Url("https://x/a.pdf".into()),
        );
        by_url.close().await;
        assert_eq!(by_url.backend().discards.load(Ordering::SeqCst), 0);
    }
}
