//! Validation and naming helpers
//!
//! Pure functions shared by the bootstrap page and the save endpoint: MIME and
//! extension derivation, the supported-type gate, and display-name cleanup.

use crate::error::AppError;
use crate::models::{supported_mime_types, SupportedFormat};
use regex::Regex;
use std::sync::LazyLock;

/// Fallback display name for documents without one.
pub const NEW_DOCUMENT_NAME: &str = "New Document";

static SUPPORTED_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(docx|xlsx|pptx|odt|ods|odp)$").expect("static regex is valid")
});

/// First `;`-delimited token of a MIME string, trimmed.
pub fn primary_mime_type(mime_type: &str) -> &str {
    mime_type.split(';').next().unwrap_or("").trim()
}

/// Lowercased substring after the last `.`; empty when the name has no dot.
pub fn file_extension(filename: &str) -> String {
    match filename.rsplit_once('.') {
        Some((_, ext)) => ext.to_ascii_lowercase(),
        None => String::new(),
    }
}

/// Strip one trailing supported extension (`report.docx` -> `report`).
pub fn strip_supported_extension(name: &str) -> String {
    SUPPORTED_SUFFIX.replace(name, "").into_owned()
}

/// Strip whatever extension the name carries (`a.b.xlsx` -> `a.b`).
pub fn strip_last_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => stem,
        _ => name,
    }
}

/// Requested name, else stored name, else the new-document fallback, without
/// a trailing supported extension. Escaping is left to the renderer.
pub fn display_name(requested: Option<&str>, stored: Option<&str>) -> String {
    let name = requested
        .filter(|n| !n.is_empty())
        .or(stored.filter(|n| !n.is_empty()))
        .unwrap_or(NEW_DOCUMENT_NAME);
    strip_supported_extension(name)
}

/// Gate a file on the supported set.
///
/// The extension is checked first; a file whose extension is unknown still
/// passes when its MIME type is one of the supported ones.
pub fn resolve_format(extension: &str, mime_type: &str) -> Result<SupportedFormat, AppError> {
    SupportedFormat::from_extension(extension)
        .or_else(|| SupportedFormat::from_mime_type(mime_type))
        .ok_or_else(|| AppError::UnsupportedFileType {
            supported: supported_mime_types(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DocumentTypeClass;

    #[test]
    fn test_primary_mime_type() {
        assert_eq!(primary_mime_type("text/plain; charset=utf-8"), "text/plain");
        assert_eq!(primary_mime_type("application/pdf"), "application/pdf");
        assert_eq!(primary_mime_type(""), "");
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("report.docx"), "docx");
        assert_eq!(file_extension("archive.tar.ODS"), "ods");
        assert_eq!(file_extension("README"), "");
        assert_eq!(file_extension("trailing."), "");
    }

    #[test]
    fn test_display_name_precedence() {
        assert_eq!(display_name(Some("Plan.xlsx"), Some("Other.docx")), "Plan");
        assert_eq!(display_name(None, Some("Other.docx")), "Other");
        assert_eq!(display_name(Some(""), None), NEW_DOCUMENT_NAME);
        assert_eq!(display_name(None, None), NEW_DOCUMENT_NAME);
    }

    #[test]
    fn test_strip_supported_extension_only_strips_supported() {
        assert_eq!(strip_supported_extension("notes.txt"), "notes.txt");
        assert_eq!(strip_supported_extension("deck.odp"), "deck");
        assert_eq!(strip_supported_extension("Budget.XLSX"), "Budget");
        assert_eq!(strip_supported_extension("deck.odp.odp"), "deck.odp");
    }

    #[test]
    fn test_strip_last_extension() {
        assert_eq!(strip_last_extension("a.b.xlsx"), "a.b");
        assert_eq!(strip_last_extension("plain"), "plain");
        assert_eq!(strip_last_extension(".hidden"), ".hidden");
    }

    #[test]
    fn test_resolve_format_by_extension_or_mime() {
        assert_eq!(resolve_format("pptx", "").unwrap(), SupportedFormat::Pptx);
        let by_mime =
            resolve_format("bin", "application/vnd.oasis.opendocument.spreadsheet").unwrap();
        assert_eq!(by_mime.document_type(), DocumentTypeClass::Sheet);
    }

    #[test]
    fn test_resolve_format_rejects_with_supported_listing() {
        let err = resolve_format("pdf", "application/pdf").unwrap_err();
        match err {
            AppError::UnsupportedFileType { supported } => {
                assert_eq!(supported.len(), 6);
                assert!(supported[0].contains("wordprocessingml"));
            }
            other => panic!("Expected UnsupportedFileType, got {:?}", other),
        }
    }
}
