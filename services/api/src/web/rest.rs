//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::adapters::pdf_text::looks_like_pdf;
use crate::web::state::AppState;
use axum::{
    extract::{
        multipart::MultipartRejection, rejection::JsonRejection, Multipart, Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::{DateTime, Utc};
use pdf_chat_core::{pipeline::answer_question, ports::PortError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

/// The only message a client ever sees for a PDF that could not be fetched or read.
pub const PDF_PROCESSING_ERROR: &str = "Could not process PDF file.";

/// The message a client sees when the LLM call fails.
pub const CHAT_ERROR: &str = "Failed to chat with PDF";

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        root_handler,
        health_handler,
        upload_handler,
        chat_handler,
        delete_document_handler,
    ),
    components(
        schemas(StatusResponse, UploadResponse, ChatRequest, ChatResponse, ErrorResponse)
    ),
    tags(
        (name = "PDF Chat API", description = "Upload a PDF and ask questions answered with page citations.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// Liveness payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub message: String,
    pub status: String,
    pub timestamp: DateTime<Utc>,
    /// Number of uploaded documents currently held (only on `/health`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documents: Option<usize>,
}

/// The response payload sent after a PDF has been uploaded and its text extracted.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub document_id: Uuid,
    pub file_name: String,
    pub total_pages: usize,
}

/// A question about either an uploaded document or a PDF reachable by URL.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub question: Option<String>,
    /// Id returned by `/upload`. Takes precedence over `fileUrl`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
}

/// The raw LLM answer, citation markers included.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub answer: String,
    pub total_pages: usize,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

fn reject(status: StatusCode, message: impl Into<String>) -> HandlerError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Logs a fetch or extraction failure and hides its details from the client.
fn pdf_processing_error(e: PortError) -> HandlerError {
    error!("Error fetching or extracting PDF: {}", e);
    reject(StatusCode::INTERNAL_SERVER_ERROR, PDF_PROCESSING_ERROR)
}

/// Maps a port failure to the status code and message a client should see.
pub fn port_error_response(e: PortError) -> HandlerError {
    match e {
        PortError::NotFound(msg) => {
            warn!("{}", msg);
            reject(StatusCode::NOT_FOUND, "Document not found")
        }
        PortError::Extraction(_) => pdf_processing_error(e),
        PortError::Upstream(_) | PortError::Unexpected(_) => {
            error!("Error chatting with PDF: {}", e);
            reject(StatusCode::INTERNAL_SERVER_ERROR, CHAT_ERROR)
        }
    }
}

fn is_pdf_mime(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|ct| ct.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/pdf"))
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Server is running", body = StatusResponse))
)]
pub async fn root_handler() -> Json<StatusResponse> {
    Json(StatusResponse {
        message: "PDF Chat Server is running!".to_string(),
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        documents: None,
    })
}

/// Liveness probe that also reports how many documents are held in memory.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Server is running", body = StatusResponse))
)]
pub async fn health_handler(State(app_state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let documents = app_state.store.count().await.ok();
    Json(StatusResponse {
        message: "PDF Chat Server is running!".to_string(),
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        documents,
    })
}

/// Upload a PDF and extract its text.
///
/// Accepts a multipart/form-data request whose `file` part is an `application/pdf` file.
/// The returned `documentId` must be passed to `/chat`.
#[utoipa::path(
    post,
    path = "/upload",
    request_body(content_type = "multipart/form-data", description = "The PDF to upload in a part named `file`."),
    responses(
        (status = 200, description = "PDF uploaded and extracted", body = UploadResponse),
        (status = 400, description = "Missing file, not a PDF, empty or too large", body = ErrorResponse),
        (status = 500, description = "The PDF could not be processed", body = ErrorResponse)
    )
)]
pub async fn upload_handler(
    State(app_state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, HandlerError> {
    let mut multipart = multipart.map_err(|e| {
        reject(
            StatusCode::BAD_REQUEST,
            format!("Expected a multipart/form-data body: {}", e.body_text()),
        )
    })?;
    let max_bytes = app_state.config.max_upload_bytes;

    let read_error = |e: axum::extract::multipart::MultipartError| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            reject(
                StatusCode::BAD_REQUEST,
                format!("File exceeds the {} byte upload limit", max_bytes),
            )
        } else {
            reject(
                StatusCode::BAD_REQUEST,
                format!("Failed to read multipart data: {}", e.body_text()),
            )
        }
    };

    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(read_error)? {
        if field.name() != Some("file") {
            continue;
        }

        if !is_pdf_mime(field.content_type()) {
            return Err(reject(StatusCode::BAD_REQUEST, "Only PDF files are allowed"));
        }
        let file_name = field.file_name().unwrap_or("document.pdf").to_string();
        let data = field.bytes().await.map_err(read_error)?;
        upload = Some((file_name, data));
        break;
    }

    let Some((file_name, data)) = upload else {
        return Err(reject(StatusCode::BAD_REQUEST, "No file uploaded"));
    };

    if data.is_empty() {
        return Err(reject(StatusCode::BAD_REQUEST, "Uploaded file is empty"));
    }
    if data.len() > max_bytes {
        return Err(reject(
            StatusCode::BAD_REQUEST,
            format!("File exceeds the {} byte upload limit", max_bytes),
        ));
    }
    if !looks_like_pdf(&data) {
        return Err(reject(StatusCode::BAD_REQUEST, "Uploaded file is not a valid PDF"));
    }

    info!("Extracting text from '{}' ({} bytes).", file_name, data.len());
    let text = app_state
        .extractor
        .extract_text(data)
        .await
        .map_err(pdf_processing_error)?;

    let document = app_state
        .store
        .create_document(&file_name, text)
        .await
        .map_err(port_error_response)?;
    info!(
        "Stored '{}' as document {} ({} pseudo-pages).",
        document.file_name, document.id, document.total_pages
    );

    Ok(Json(UploadResponse {
        success: true,
        document_id: document.id,
        file_name: document.file_name,
        total_pages: document.total_pages,
    }))
}

/// Ask a question about a PDF.
///
/// The PDF is either a previously uploaded document (`documentId`) or a public URL
/// (`fileUrl`) that is fetched for this request only.
#[utoipa::path(
    post,
    path = "/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Answer generated", body = ChatResponse),
        (status = 400, description = "Missing question or document reference", body = ErrorResponse),
        (status = 404, description = "Unknown documentId", body = ErrorResponse),
        (status = 500, description = "PDF or LLM failure", body = ErrorResponse)
    )
)]
pub async fn chat_handler(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, HandlerError> {
    let Json(request) = payload.map_err(|e| {
        reject(
            StatusCode::BAD_REQUEST,
            format!("Invalid request body: {}", e.body_text()),
        )
    })?;

    let question = request
        .question
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| reject(StatusCode::BAD_REQUEST, "question is required"))?;

    let file_url = request
        .file_url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty());

    let text = match (request.document_id, file_url) {
        (Some(document_id), _) => {
            app_state
                .store
                .get_document(document_id)
                .await
                .map_err(port_error_response)?
                .text
        }
        (None, Some(url)) => {
            let data = app_state
                .fetcher
                .fetch_pdf(url)
                .await
                .map_err(pdf_processing_error)?;
            app_state
                .extractor
                .extract_text(data)
                .await
                .map_err(pdf_processing_error)?
        }
        (None, None) => {
            return Err(reject(
                StatusCode::BAD_REQUEST,
                "documentId or fileUrl is required",
            ))
        }
    };

    let answer = answer_question(
        app_state.qa_adapter.as_ref(),
        &text,
        question,
        app_state.answer_options(),
    )
    .await
    .map_err(port_error_response)?;

    Ok(Json(ChatResponse {
        answer: answer.answer,
        total_pages: answer.total_pages,
    }))
}

/// Discard an uploaded document ("close PDF").
#[utoipa::path(
    delete,
    path = "/documents/{id}",
    params(("id" = Uuid, Path, description = "The id returned by `/upload`.")),
    responses(
        (status = 204, description = "Document discarded"),
        (status = 404, description = "Unknown document", body = ErrorResponse)
    )
)]
pub async fn delete_document_handler(
    State(app_state): State<Arc<AppState>>,
    Path(document_id): Path<Uuid>,
) -> Result<StatusCode, HandlerError> {
    app_state
        .store
        .delete_document(document_id)
        .await
        .map_err(port_error_response)?;
    info!("Discarded document {}.", document_id);
    Ok(StatusCode::NO_CONTENT)
}
