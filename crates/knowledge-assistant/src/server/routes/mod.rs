//! API routes for the assistant server

pub mod documents;
pub mod messages;
pub mod sessions;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::server::state::AppState;
use crate::types::DocumentKind;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // Sessions
        .route("/sessions", post(sessions::create_session))
        .route(
            "/sessions/:id",
            get(sessions::get_session).delete(sessions::delete_session),
        )
        .route("/sessions/:id/reset", post(sessions::reset_session))
        // Documents - with larger body limit for file uploads
        .route(
            "/sessions/:id/documents",
            post(documents::upload_documents).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        // Conversation
        .route("/sessions/:id/messages", post(messages::send_message))
        // Info
        .route("/info", get(info))
}

/// API info endpoint
async fn info(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "knowledge-assistant",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Chat with uploaded PDF, Word and text documents",
        "model": state.config().llm.model,
        "accepted_extensions": DocumentKind::accepted_extensions(),
        "active_sessions": state.sessions().len(),
        "endpoints": {
            "POST /api/sessions": "Start a session",
            "GET /api/sessions/:id": "Session history and active documents",
            "DELETE /api/sessions/:id": "End a session",
            "POST /api/sessions/:id/documents": "Upload documents (multipart), replacing the active set",
            "POST /api/sessions/:id/messages": "Ask a question about the active documents",
            "POST /api/sessions/:id/reset": "Start a new chat"
        }
    }))
}
