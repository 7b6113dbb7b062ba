//! Fixed format-to-MIME table used when storing saved documents.

use crate::models::SupportedFormat;

/// MIME type used when a format has no entry in the table.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

const EXTRA_TYPES: &[(&str, &str)] = &[
    ("doc", "application/msword"),
    ("xls", "application/vnd.ms-excel"),
    ("ppt", "application/vnd.ms-powerpoint"),
    ("pdf", "application/pdf"),
    ("rtf", "application/rtf"),
    ("csv", "text/csv"),
    ("txt", "text/plain"),
    ("html", "text/html"),
    ("md", "text/markdown"),
];

/// Resolve the MIME type for a save `format`. Unknown formats fall back to
/// `application/octet-stream` rather than failing.
pub fn mime_type_for_format(format: &str) -> &'static str {
    if let Some(supported) = SupportedFormat::from_extension(format) {
        return supported.mime_type();
    }
    let format = format.to_ascii_lowercase();
    EXTRA_TYPES
        .iter()
        .find(|(ext, _)| *ext == format)
        .map(|(_, mime)| *mime)
        .unwrap_or(DEFAULT_MIME_TYPE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_office_formats() {
        assert_eq!(
            mime_type_for_format("docx"),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        );
        assert_eq!(
            mime_type_for_format("ODS"),
            "application/vnd.oasis.opendocument.spreadsheet"
        );
    }

    #[test]
    fn test_unknown_format_falls_back() {
        assert_eq!(mime_type_for_format("xyz"), DEFAULT_MIME_TYPE);
        assert_eq!(mime_type_for_format(""), DEFAULT_MIME_TYPE);
        assert_eq!(mime_type_for_format("pdf"), "application/pdf");
    }
}
