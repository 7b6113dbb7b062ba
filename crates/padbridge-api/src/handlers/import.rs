//! Import route: serves a file's bytes by signed token (no session).
//! The editor fetches the document source through it.

use crate::error::{HttpAppError, ValidatedQuery};
use crate::state::AppState;
use crate::utils::import_token;
use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::Response,
};
use futures::StreamExt;
use padbridge_core::mime::DEFAULT_MIME_TYPE;
use padbridge_core::AppError;
use padbridge_storage::resolve_canonical;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct ImportQuery {
    #[serde(default)]
    pub data: String,
}

/// Serve a file by signed token. The token proves the file id and expiry.
#[tracing::instrument(skip(state, query), fields(operation = "import_document"))]
pub async fn import_document(
    State(state): State<Arc<AppState>>,
    ValidatedQuery(query): ValidatedQuery<ImportQuery>,
) -> Result<Response, HttpAppError> {
    let token = query.data.trim();
    if token.is_empty() {
        return Err(AppError::InvalidInput("Missing data parameter".to_string()).into());
    }
    let grant = import_token::decode(token, state.config.jwt_secret().as_bytes())?;
    tracing::debug!(
        file_id = grant.file_id,
        expires_at = grant.expires_at,
        "Import token accepted"
    );
    let file_id = grant.file_id;

    let file = resolve_canonical(state.store.as_ref(), file_id)
        .await?
        .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

    let stream = state.store.read_stream(file.file_id).await.map_err(|e| {
        tracing::error!(error = %e, file_id = file.file_id, "Failed to read file from store");
        HttpAppError::from(e)
    })?;

    let body_stream = stream.map(|result| {
        result.map_err(|e| std::io::Error::other(format!("Store stream error: {}", e)))
    });

    let content_type = if file.mime_type.is_empty() {
        DEFAULT_MIME_TYPE
    } else {
        file.mime_type.as_str()
    };

    tracing::debug!(file_id = file.file_id, size_bytes = file.size, "Serving document to editor");

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CACHE_CONTROL, "private, no-store")
        .body(Body::from_stream(body_stream))
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to build response");
            HttpAppError::from(AppError::Internal(e.to_string()))
        })?;

    Ok(response)
}
