pub mod http_chat;
pub mod memory_store;
pub mod pdf_fetch;
pub mod pdf_text;
pub mod qa_llm;

#[cfg(test)]
mod canned_http;

pub use http_chat::HttpChatBackend;
pub use memory_store::InMemoryDocumentStore;
pub use pdf_fetch::HttpPdfFetcher;
pub use pdf_text::PdfExtractAdapter;
pub use qa_llm::OpenAiQaAdapter;
