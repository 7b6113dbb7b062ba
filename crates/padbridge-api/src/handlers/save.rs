//! Save endpoint (`POST /tiki-edit_cryptpad.php`).

use crate::auth::RequestContext;
use crate::error::{HttpAppError, ValidatedForm};
use crate::handlers::access::resolve_and_authorize;
use crate::state::AppState;
use crate::utils::serde_helpers::empty_string_as_none;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
};
use base64::Engine;
use padbridge_core::mime::mime_type_for_format;
use padbridge_core::models::{FileReplacement, NewFile};
use padbridge_core::validation::display_name;
use padbridge_core::AppError;
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct SaveForm {
    #[serde(rename = "fileId", default, deserialize_with = "empty_string_as_none")]
    pub file_id: Option<i64>,
    /// Base64 document content
    pub data: String,
    #[serde(default)]
    #[validate(length(max = 200))]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[serde(default)]
    #[validate(length(max = 16))]
    pub format: Option<String>,
    #[serde(rename = "galleryId", default, deserialize_with = "empty_string_as_none")]
    pub gallery_id: Option<i64>,
}

impl SaveForm {
    fn requested_format(&self) -> Option<&str> {
        self.format
            .as_deref()
            .map(str::trim)
            .filter(|format| !format.is_empty())
    }
}

/// Replace a gallery file with the document the editor produced.
///
/// Responds with the id of the file written, as plain text.
#[tracing::instrument(
    skip(state, ctx, form),
    fields(
        operation = "save_document",
        file_id = form.file_id.unwrap_or(0),
        request_id = ctx.request_id.as_deref().unwrap_or("-")
    )
)]
pub async fn save_document(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    ValidatedForm(form): ValidatedForm<SaveForm>,
) -> Result<impl IntoResponse, HttpAppError> {
    form.validate().map_err(AppError::from)?;

    if let Some(format) = form.requested_format() {
        if !format.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(AppError::InvalidInput(format!("Invalid format: {}", format)).into());
        }
    }

    let file_id = form.file_id.unwrap_or(0);
    let resolved =
        resolve_and_authorize(&state, &ctx.identity, file_id, form.requested_format()).await?;

    let format = form
        .requested_format()
        .map(str::to_string)
        .unwrap_or_else(|| resolved.format.extension().to_string());

    let data = base64::engine::general_purpose::STANDARD
        .decode(form.data.trim())
        .map_err(|e| AppError::InvalidInput(format!("data is not valid base64: {}", e)))?;
    if data.len() > state.config.max_document_size_bytes() {
        return Err(AppError::PayloadTooLarge(format!(
            "{} bytes exceeds max {} bytes",
            data.len(),
            state.config.max_document_size_bytes()
        ))
        .into());
    }

    let mime_type = mime_type_for_format(&format);
    let name = display_name(form.name.as_deref(), resolved.stored_name());

    let target_id = match &resolved.reference {
        Some(file) => file.file_id,
        None => {
            let gallery_id = form.gallery_id.filter(|id| *id > 0).ok_or_else(|| {
                AppError::InvalidInput("galleryId is required to create a file".to_string())
            })?;
            let description = form
                .description
                .clone()
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| name.clone());
            let created = state
                .store
                .init(
                    file_id,
                    NewFile {
                        gallery_id,
                        description,
                        owner: ctx.identity.user_name().map(String::from),
                    },
                )
                .await?;
            tracing::info!(
                file_id = created.file_id,
                gallery_id,
                "Initialised gallery file for first save"
            );
            created.file_id
        }
    };

    let size = data.len();
    let filename = format!("{}.{}", name, format);
    let updated = state
        .store
        .replace(
            target_id,
            FileReplacement {
                data,
                mime_type: mime_type.to_string(),
                name,
                filename,
            },
        )
        .await?;

    tracing::info!(
        file_id = updated.file_id,
        filename = %updated.filename,
        mime_type = %updated.mime_type,
        size_bytes = size,
        "Document saved"
    );

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        updated.file_id.to_string(),
    ))
}
