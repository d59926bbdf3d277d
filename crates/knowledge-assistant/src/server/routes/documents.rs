//! Document upload endpoint

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{DocumentKind, IngestReport, Upload};

/// POST /api/sessions/:id/documents - Replace the session's active documents
///
/// Every multipart field carrying a filename is treated as one file. The whole
/// upload is rejected if any file has an unsupported extension.
pub async fn upload_documents(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<IngestReport>> {
    let session = state.sessions().get(&id)?;

    let mut uploads = Vec::new();
    let mut unsupported = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::bad_request(format!("Failed to read multipart field: {}", e)))?
    {
        let Some(filename) = field.file_name().map(|s| s.to_string()) else {
            tracing::debug!("Ignoring non-file field {:?}", field.name());
            continue;
        };

        let data = field
            .bytes()
            .await
            .map_err(|e| Error::bad_request(format!("Failed to read {}: {}", filename, e)))?;

        tracing::info!("Received file: {} ({} bytes)", filename, data.len());

        match Upload::new(filename.clone(), data) {
            Some(upload) => uploads.push(upload),
            None => unsupported.push(filename),
        }
    }

    if !unsupported.is_empty() {
        return Err(Error::UnsupportedFileType(format!(
            "{} (accepted: {})",
            unsupported.join(", "),
            DocumentKind::accepted_extensions().join(", ")
        )));
    }

    let mut session = session.lock().await;
    let report = state.manager().ingest(&mut session, uploads).await?;
    Ok(Json(report))
}
