//! File resolution, type gate and permission check shared by the edit page and the save endpoint.

use crate::auth::{ensure_file_access, Identity};
use crate::error::HttpAppError;
use crate::state::AppState;
use padbridge_core::models::{FileReference, SupportedFormat};
use padbridge_core::validation::resolve_format;
use padbridge_storage::resolve_canonical;

/// A file reference after archive redirection, with its editor format.
#[derive(Debug, Clone)]
pub struct ResolvedFile {
    /// `None` for a document that does not exist yet
    pub reference: Option<FileReference>,
    pub format: SupportedFormat,
}

impl ResolvedFile {
    /// Display name stored in the gallery, falling back to the stored filename.
    pub fn stored_name(&self) -> Option<&str> {
        self.reference.as_ref().map(|file| {
            if file.name.is_empty() {
                file.filename.as_str()
            } else {
                file.name.as_str()
            }
        })
    }
}

/// Resolve `file_id` (following the archive linkage once), check that the
/// editor supports the file and that the caller may access it.
///
/// A document that does not exist yet is typed by `requested_format`.
pub async fn resolve_and_authorize(
    state: &AppState,
    identity: &Identity,
    file_id: i64,
    requested_format: Option<&str>,
) -> Result<ResolvedFile, HttpAppError> {
    let reference = resolve_canonical(state.store.as_ref(), file_id).await?;

    let format = match &reference {
        Some(file) => resolve_format(&file.extension(), file.primary_mime_type())?,
        None => resolve_format(requested_format.unwrap_or_default(), "")?,
    };

    ensure_file_access(state.permissions.as_ref(), identity, reference.as_ref()).await?;

    if let Some(file) = &reference {
        if file.file_id != file_id {
            tracing::debug!(
                requested = file_id,
                canonical = file.file_id,
                "Redirected to archived version"
            );
        }
    }

    Ok(ResolvedFile { reference, format })
}
