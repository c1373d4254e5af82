//! services/api/src/web/router.rs
//!
//! Builds the complete Axum router: REST routes, middleware layers and the
//! Swagger UI.

use crate::web::{
    rest::{
        chat_handler, delete_document_handler, health_handler, root_handler, upload_handler,
        ApiDoc,
    },
    state::AppState,
};
use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderName, HeaderValue, Method,
    },
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Room for multipart boundaries and headers on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

fn cors_layer(allowed_origin: Option<&str>) -> CorsLayer {
    let origin = match allowed_origin.map(str::parse::<HeaderValue>) {
        Some(Ok(origin)) => AllowOrigin::exact(origin),
        Some(Err(e)) => {
            warn!("Ignoring invalid CORS_ALLOWED_ORIGIN ({}); mirroring request origins.", e);
            AllowOrigin::mirror_request()
        }
        None => AllowOrigin::mirror_request(),
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            CONTENT_TYPE,
            AUTHORIZATION,
            ACCEPT,
            HeaderName::from_static("x-requested-with"),
        ])
}

/// Assembles the application router around the shared state.
pub fn build_router(app_state: Arc<AppState>) -> Router {
    let body_limit = app_state.config.max_upload_bytes + MULTIPART_OVERHEAD;
    let cors = cors_layer(app_state.config.cors_allowed_origin.as_deref());

    let api_router = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/upload", post(upload_handler))
        .route("/chat", post(chat_handler))
        .route("/documents/{id}", delete(delete_document_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
