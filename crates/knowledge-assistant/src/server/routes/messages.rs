//! Conversation endpoint

use axum::{
    extract::{Path, State},
    Json,
};
use std::time::Instant;
use uuid::Uuid;

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::{MessageRequest, MessageResponse};

/// POST /api/sessions/:id/messages - Ask a question about the active documents
pub async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<MessageRequest>,
) -> Result<Json<MessageResponse>> {
    let start = Instant::now();
    let session = state.sessions().get(&id)?;
    let mut session = session.lock().await;

    tracing::info!("Session {}: question ({} characters)", id, request.content.chars().count());
    tracing::debug!("Session {}: question \"{}\"", id, request.content);

    let turn = state.manager().send_message(&mut session, &request.content).await?;

    Ok(Json(MessageResponse {
        turn,
        turn_count: session.turns().len(),
        processing_time_ms: start.elapsed().as_millis() as u64,
    }))
}
