//! Edit/view bootstrap page (`GET /tiki-edit_cryptpad.php`).

use crate::auth::RequestContext;
use crate::error::{HttpAppError, ValidatedQuery};
use crate::handlers::access::resolve_and_authorize;
use crate::state::AppState;
use crate::utils::import_token;
use crate::utils::serde_helpers::empty_string_as_none;
use axum::{
    extract::State,
    response::{Html, IntoResponse, Response},
};
use padbridge_core::constants::{
    EDITOR_API_SCRIPT, EDITOR_HEIGHT, EDITOR_SESSION_TAG, EDITOR_WIDTH, EDIT_ENDPOINT,
    GALLERY_LISTING_ENDPOINT, IMPORT_TOKEN_TTL_SECS,
};
use padbridge_core::models::{EditSession, EditorPolling, SessionMode};
use padbridge_core::validation::{display_name, strip_last_extension};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct EditSessionQuery {
    #[serde(rename = "fileId", default, deserialize_with = "empty_string_as_none")]
    pub file_id: Option<i64>,
    #[serde(rename = "galleryId", default, deserialize_with = "empty_string_as_none")]
    pub gallery_id: Option<i64>,
    #[serde(default)]
    pub edit: Option<String>,
    /// Direct pad link, passed through to the page
    #[serde(default)]
    pub pad: Option<String>,
    /// Format of a document that does not exist yet
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// `edit` counts when present with anything but `0`, `false` or an empty value.
fn edit_requested(edit: Option<&str>) -> bool {
    match edit.map(|v| v.trim().to_ascii_lowercase()) {
        Some(v) => !matches!(v.as_str(), "" | "0" | "false"),
        None => false,
    }
}

/// Render the editor page for a gallery file.
#[tracing::instrument(
    skip(state, ctx, query),
    fields(
        operation = "edit_session",
        file_id = query.file_id.unwrap_or(0),
        request_id = ctx.request_id.as_deref().unwrap_or("-")
    )
)]
pub async fn edit_session(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    ValidatedQuery(query): ValidatedQuery<EditSessionQuery>,
) -> Result<Response, HttpAppError> {
    let file_id = query.file_id.unwrap_or(0);
    let resolved =
        resolve_and_authorize(&state, &ctx.identity, file_id, query.format.as_deref()).await?;

    let stored_name = resolved.stored_name();
    let display_name = display_name(query.name.as_deref(), stored_name);

    let gallery_id = resolved
        .reference
        .as_ref()
        .map(|file| file.gallery_id)
        .filter(|id| *id > 0)
        .or(query.gallery_id)
        .unwrap_or(0);

    let Some(editor_base_url) = state.config.cryptpad_base_url() else {
        tracing::warn!("Editor base URL not configured, rendering degraded page");
        let html = state.pages.render_missing_package(&display_name)?;
        return Ok(Html(html).into_response());
    };
    let editor_base_url = editor_base_url.trim_end_matches('/');

    let import_url = match &resolved.reference {
        Some(file) => {
            let token = import_token::create(
                file.file_id,
                Duration::from_secs(IMPORT_TOKEN_TTL_SECS),
                state.config.jwt_secret().as_bytes(),
            )?;
            Some(import_token::import_url(
                state.config.public_base_url(),
                &token,
            ))
        }
        None => None,
    };

    let mode = if edit_requested(query.edit.as_deref()) {
        SessionMode::Edit
    } else {
        SessionMode::View
    };
    let effective_id = resolved
        .reference
        .as_ref()
        .map(|file| file.file_id)
        .unwrap_or(file_id);
    let save_name = match stored_name {
        Some(name) => strip_last_extension(name).to_string(),
        None => display_name.clone(),
    };

    let session = EditSession {
        file_id: effective_id,
        gallery_id,
        import_url,
        document_type: resolved.format.document_type(),
        file_extension: resolved.format.extension().to_string(),
        editor_base_url: editor_base_url.to_string(),
        display_name,
        save_name,
        mode,
        session_tag: EDITOR_SESSION_TAG.to_string(),
        session_key_name: EditSession::session_key_name_for(effective_id),
        pad_url: query.pad.filter(|pad| !pad.is_empty()),
        save_url: EDIT_ENDPOINT.to_string(),
        gallery_listing_url: format!("{}?galleryId={}", GALLERY_LISTING_ENDPOINT, gallery_id),
        user: ctx.identity.editor_user(),
        polling: EditorPolling {
            interval_ms: state.config.editor_poll_interval_ms(),
            timeout_ms: state.config.editor_load_timeout_ms(),
        },
        width: EDITOR_WIDTH.to_string(),
        height: EDITOR_HEIGHT.to_string(),
    };

    let editor_script_url = format!("{}/{}", editor_base_url, EDITOR_API_SCRIPT);
    let html = state.pages.render_session(&session, &editor_script_url)?;

    tracing::info!(
        file_id = session.file_id,
        mode = session.mode.as_str(),
        document_type = %session.document_type,
        "Edit session started"
    );

    Ok(Html(html).into_response())
}
