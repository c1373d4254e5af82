pub mod chat;
pub mod citations;
pub mod domain;
pub mod extraction;
pub mod pagination;
pub mod pipeline;
pub mod ports;
pub mod prompt;

pub use chat::{Conversation, PendingTurn, SendRejected, TurnPhase};
pub use citations::{extract_citations, CitedAnswer};
pub use domain::{Author, ChatAnswer, ChatMessage, Citation, Document, DocumentRef, PseudoPage};
pub use pipeline::{answer_question, AnswerOptions};
pub use ports::{
    ChatBackend, DocumentStore, PdfFetchService, PortError, PortResult, QuestionAnsweringService,
    TextExtractionService,
};
