//! Session lifecycle endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::SessionSummary;

/// POST /api/sessions - Start a session
pub async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionSummary>) {
    let (id, session) = state.sessions().create();
    tracing::info!("Session {} created", id);

    let session = session.lock().await;
    let summary = SessionSummary::from_session(&session, &state.config().ingestion);
    (StatusCode::CREATED, Json(summary))
}

/// GET /api/sessions/:id - Session snapshot
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSummary>> {
    let session = state.sessions().get(&id)?;
    let session = session.lock().await;
    Ok(Json(SessionSummary::from_session(
        &session,
        &state.config().ingestion,
    )))
}

/// DELETE /api/sessions/:id - End a session
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.sessions().remove(&id)?;
    tracing::info!("Session {} deleted", id);
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/sessions/:id/reset - Start a new chat
pub async fn reset_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSummary>> {
    let session = state.sessions().get(&id)?;
    let mut session = session.lock().await;
    state.manager().new_chat(&mut session);
    Ok(Json(SessionSummary::from_session(
        &session,
        &state.config().ingestion,
    )))
}
