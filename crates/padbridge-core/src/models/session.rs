use serde::{Deserialize, Serialize};

use super::DocumentTypeClass;

/// Whether the embedded editor may write back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    Edit,
    View,
}

impl SessionMode {
    pub fn is_edit(&self) -> bool {
        matches!(self, SessionMode::Edit)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionMode::Edit => "edit",
            SessionMode::View => "view",
        }
    }
}

/// User shown to other collaborators inside the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorUser {
    pub id: String,
    pub name: String,
}

impl EditorUser {
    pub fn anonymous() -> Self {
        Self {
            id: "anonymous".to_string(),
            name: "Anonymous User".to_string(),
        }
    }

    pub fn named(user: &str) -> Self {
        Self {
            id: user.to_string(),
            name: user.to_string(),
        }
    }
}

/// Readiness polling for the editor's client library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorPolling {
    pub interval_ms: u64,
    pub timeout_ms: u64,
}

/// Everything the browser needs to start one embedded editor instance.
///
/// Built once per page load and serialized into the page; never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditSession {
    pub file_id: i64,
    pub gallery_id: i64,
    /// Signed document source URL; absent for documents that do not exist yet
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import_url: Option<String>,
    pub document_type: DocumentTypeClass,
    pub file_extension: String,
    /// Editor base URL without a trailing slash
    pub editor_base_url: String,
    pub display_name: String,
    /// Name posted back on save: the stored name without its last extension
    pub save_name: String,
    pub mode: SessionMode,
    pub session_tag: String,
    /// localStorage key holding the collaboration key for this file
    pub session_key_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pad_url: Option<String>,
    pub save_url: String,
    pub gallery_listing_url: String,
    pub user: EditorUser,
    pub polling: EditorPolling,
    pub width: String,
    pub height: String,
}

impl EditSession {
    /// localStorage key for the collaboration key of `file_id`.
    pub fn session_key_name_for(file_id: i64) -> String {
        format!("cryptpad_key_{}", file_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_serializes_camel_case() {
        let session = EditSession {
            file_id: 42,
            gallery_id: 5,
            import_url: None,
            document_type: DocumentTypeClass::Doc,
            file_extension: "docx".to_string(),
            editor_base_url: "https://pad.example.com".to_string(),
            display_name: "report".to_string(),
            save_name: "report".to_string(),
            mode: SessionMode::Edit,
            session_tag: "tiki_cryptpad".to_string(),
            session_key_name: EditSession::session_key_name_for(42),
            pad_url: None,
            save_url: "tiki-edit_cryptpad.php".to_string(),
            gallery_listing_url: "tiki-list_file_gallery.php?galleryId=5".to_string(),
            user: EditorUser::anonymous(),
            polling: EditorPolling {
                interval_ms: 100,
                timeout_ms: 10_000,
            },
            width: "100%".to_string(),
            height: "800px".to_string(),
        };
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["fileId"], 42);
        assert_eq!(json["documentType"], "doc");
        assert_eq!(json["mode"], "edit");
        assert_eq!(json["polling"]["intervalMs"], 100);
        assert_eq!(json["sessionKeyName"], "cryptpad_key_42");
        assert!(json.get("importUrl").is_none());
        assert!(json.get("padUrl").is_none());
    }
}
