//! services/api/src/adapters/http_chat.rs
//!
//! The client-side adapter: talks to this service over HTTP and implements the
//! `ChatBackend` port so a `Conversation` can drive it.

use async_trait::async_trait;
use pdf_chat_core::{
    domain::{ChatAnswer, DocumentRef},
    ports::{ChatBackend, PortError, PortResult},
};
use reqwest::{multipart, StatusCode};
use std::path::Path;
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

use crate::web::rest::{ChatRequest, ChatResponse, ErrorResponse, UploadResponse};

/// Timeout applied to every request the client makes.
pub const CLIENT_TIMEOUT: Duration = Duration::from_secs(30);

/// An HTTP client for the PDF chat API.
#[derive(Clone)]
pub struct HttpChatBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpChatBackend {
    /// Creates a client for the server at `base_url` (e.g. `http://localhost:3000`).
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Uploads a local PDF and returns the server's description of it.
    pub async fn upload(&self, path: &Path) -> PortResult<UploadResponse> {
        let data = tokio::fs::read(path).await.map_err(|e| {
            PortError::Unexpected(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("document.pdf")
            .to_string();

        let part = multipart::Part::bytes(data)
            .file_name(file_name)
            .mime_str("application/pdf")
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(self.url("/upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| PortError::Upstream(e.to_string()))?;
        let upload: UploadResponse = parse_json(response).await?;
        info!(
            "Uploaded {} as document {} ({} pseudo-pages).",
            upload.file_name, upload.document_id, upload.total_pages
        );
        Ok(upload)
    }
}

/// Maps a non-success response to a `PortError`, otherwise decodes the body.
async fn parse_json<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> PortResult<T> {
    let status = response.status();
    if status.is_success() {
        return response
            .json::<T>()
            .await
            .map_err(|e| PortError::Upstream(format!("Malformed response body: {}", e)));
    }

    let message = response
        .json::<ErrorResponse>()
        .await
        .map(|body| body.error)
        .unwrap_or_else(|_| status.to_string());
    Err(status_error(status, message))
}

fn status_error(status: StatusCode, message: String) -> PortError {
    match status {
        StatusCode::NOT_FOUND => PortError::NotFound(message),
        _ => PortError::Upstream(format!("{}: {}", status, message)),
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn ask(&self, question: &str, document: &DocumentRef) -> PortResult<ChatAnswer> {
        let request = match document {
            DocumentRef::Uploaded(id) => ChatRequest {
                question: Some(question.to_string()),
                document_id: Some(*id),
                file_url: None,
            },
            DocumentRef::Url(url) => ChatRequest {
                question: Some(question.to_string()),
                document_id: None,
                file_url: Some(url.clone()),
            },
        };

        let response = self
            .client
            .post(self.url("/chat"))
            .json(&request)
            .send()
            .await
            .map_err(|e| PortError::Upstream(e.to_string()))?;
        let body: ChatResponse = parse_json(response).await?;

        Ok(ChatAnswer {
            answer: body.answer,
            total_pages: body.total_pages,
        })
    }

    async fn discard(&self, document_id: Uuid) -> PortResult<()> {
        let response = self
            .client
            .delete(self.url(&format!("/documents/{}", document_id)))
            .send()
            .await
            .map_err(|e| PortError::Upstream(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(status_error(status, format!("Could not discard {}", document_id)))
        }
    }
}
