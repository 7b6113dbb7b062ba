use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Editor-facing document category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentTypeClass {
    Doc,
    Sheet,
    Presentation,
}

impl DocumentTypeClass {
    /// Classify a file extension. Only the six supported extensions classify.
    pub fn from_extension(extension: &str) -> Option<Self> {
        SupportedFormat::from_extension(extension).map(|format| format.document_type())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentTypeClass::Doc => "doc",
            DocumentTypeClass::Sheet => "sheet",
            DocumentTypeClass::Presentation => "presentation",
        }
    }
}

impl Display for DocumentTypeClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Office formats the collaborative editor can open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportedFormat {
    Docx,
    Xlsx,
    Pptx,
    Odt,
    Ods,
    Odp,
}

impl SupportedFormat {
    pub const ALL: [SupportedFormat; 6] = [
        SupportedFormat::Docx,
        SupportedFormat::Xlsx,
        SupportedFormat::Pptx,
        SupportedFormat::Odt,
        SupportedFormat::Ods,
        SupportedFormat::Odp,
    ];

    /// Case-insensitive lookup by extension (without the dot).
    pub fn from_extension(extension: &str) -> Option<Self> {
        let extension = extension.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.extension() == extension)
    }

    /// Lookup by MIME type. Parameters after `;` are ignored.
    pub fn from_mime_type(mime_type: &str) -> Option<Self> {
        let primary = mime_type.split(';').next().unwrap_or("").trim();
        Self::ALL
            .into_iter()
            .find(|format| format.mime_type().eq_ignore_ascii_case(primary))
    }

    pub fn extension(&self) -> &'static str {
        match self {
            SupportedFormat::Docx => "docx",
            SupportedFormat::Xlsx => "xlsx",
            SupportedFormat::Pptx => "pptx",
            SupportedFormat::Odt => "odt",
            SupportedFormat::Ods => "ods",
            SupportedFormat::Odp => "odp",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            SupportedFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            SupportedFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            SupportedFormat::Pptx => {
                "application/vnd.openxmlformats-officedocument.presentationml.presentation"
            }
            SupportedFormat::Odt => "application/vnd.oasis.opendocument.text",
            SupportedFormat::Ods => "application/vnd.oasis.opendocument.spreadsheet",
            SupportedFormat::Odp => "application/vnd.oasis.opendocument.presentation",
        }
    }

    pub fn document_type(&self) -> DocumentTypeClass {
        match self {
            SupportedFormat::Docx | SupportedFormat::Odt => DocumentTypeClass::Doc,
            SupportedFormat::Xlsx | SupportedFormat::Ods => DocumentTypeClass::Sheet,
            SupportedFormat::Pptx | SupportedFormat::Odp => DocumentTypeClass::Presentation,
        }
    }
}

impl Display for SupportedFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.extension())
    }
}

impl FromStr for SupportedFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s).ok_or_else(|| anyhow::anyhow!("Unsupported format: {}", s))
    }
}

/// Supported extensions, in the order they are advertised.
pub fn supported_extensions() -> Vec<&'static str> {
    SupportedFormat::ALL.iter().map(|f| f.extension()).collect()
}

/// Supported MIME types, in the same order as `supported_extensions`.
pub fn supported_mime_types() -> Vec<String> {
    SupportedFormat::ALL
        .iter()
        .map(|f| f.mime_type().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_is_total_over_supported_extensions() {
        let expected = [
            ("docx", DocumentTypeClass::Doc),
            ("xlsx", DocumentTypeClass::Sheet),
            ("pptx", DocumentTypeClass::Presentation),
            ("odt", DocumentTypeClass::Doc),
            ("ods", DocumentTypeClass::Sheet),
            ("odp", DocumentTypeClass::Presentation),
        ];
        for (ext, class) in expected {
            assert_eq!(DocumentTypeClass::from_extension(ext), Some(class), "{}", ext);
        }
    }

    #[test]
    fn test_unsupported_extensions_do_not_classify() {
        for ext in ["doc", "pdf", "txt", "", "docx.bak"] {
            assert_eq!(DocumentTypeClass::from_extension(ext), None, "{}", ext);
        }
    }

    #[test]
    fn test_extension_lookup_ignores_case() {
        assert_eq!(SupportedFormat::from_extension("XLSX"), Some(SupportedFormat::Xlsx));
    }

    #[test]
    fn test_mime_lookup_ignores_parameters() {
        assert_eq!(
            SupportedFormat::from_mime_type("application/vnd.oasis.opendocument.text; charset=binary"),
            Some(SupportedFormat::Odt)
        );
        assert_eq!(SupportedFormat::from_mime_type("text/plain"), None);
    }

    #[test]
    fn test_document_type_serializes_lowercase() {
        let json = serde_json::to_string(&DocumentTypeClass::Presentation).unwrap();
        assert_eq!(json, "\"presentation\"");
        assert_eq!(DocumentTypeClass::Sheet.to_string(), "sheet");
    }

    #[test]
    fn test_supported_lists_line_up() {
        let exts = supported_extensions();
        let mimes = supported_mime_types();
        assert_eq!(exts, vec!["docx", "xlsx", "pptx", "odt", "ods", "odp"]);
        assert_eq!(mimes.len(), exts.len());
        assert!(mimes[3].ends_with("opendocument.text"));
    }
}
