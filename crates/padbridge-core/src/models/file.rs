use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity and metadata of a document stored in a file gallery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileReference {
    pub file_id: i64,
    pub gallery_id: i64,
    /// Display name
    pub name: String,
    /// Stored filename, including extension
    pub filename: String,
    /// Stored MIME string; may carry parameters after `;`
    pub mime_type: String,
    /// Points at the canonical (latest archived) version of this file
    #[serde(default)]
    pub archive_id: Option<i64>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub size: u64,
    pub last_modified: DateTime<Utc>,
}

impl FileReference {
    /// The file edits must be redirected to, if any.
    pub fn redirect_target(&self) -> Option<i64> {
        self.archive_id.filter(|id| *id > 0)
    }

    /// First `;`-delimited token of the stored MIME string.
    pub fn primary_mime_type(&self) -> &str {
        crate::validation::primary_mime_type(&self.mime_type)
    }

    /// Substring after the last `.` of the stored filename, lowercased.
    pub fn extension(&self) -> String {
        crate::validation::file_extension(&self.filename)
    }
}

/// Parameters for creating a record that does not exist yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFile {
    pub gallery_id: i64,
    pub description: String,
    pub owner: Option<String>,
}

/// Full replacement of a file's content and naming, applied atomically.
#[derive(Debug, Clone, PartialEq)]
pub struct FileReplacement {
    pub data: Vec<u8>,
    pub mime_type: String,
    pub name: String,
    pub filename: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(archive_id: Option<i64>) -> FileReference {
        FileReference {
            file_id: 42,
            gallery_id: 5,
            name: "report".to_string(),
            filename: "report.DOCX".to_string(),
            mime_type: "application/vnd.openxmlformats-officedocument.wordprocessingml.document; charset=binary"
                .to_string(),
            archive_id,
            description: String::new(),
            owner: None,
            size: 0,
            last_modified: Utc::now(),
        }
    }

    #[test]
    fn test_redirect_target_requires_positive_archive_id() {
        assert_eq!(reference(None).redirect_target(), None);
        assert_eq!(reference(Some(0)).redirect_target(), None);
        assert_eq!(reference(Some(-3)).redirect_target(), None);
        assert_eq!(reference(Some(77)).redirect_target(), Some(77));
    }

    #[test]
    fn test_derived_type_and_extension() {
        let file = reference(None);
        assert_eq!(
            file.primary_mime_type(),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        );
        assert_eq!(file.extension(), "docx");
    }

    #[test]
    fn test_metadata_json_defaults() {
        let json = r#"{
            "file_id": 3,
            "gallery_id": 1,
            "name": "Budget",
            "filename": "budget.ods",
            "mime_type": "application/vnd.oasis.opendocument.spreadsheet",
            "last_modified": "2024-01-01T00:00:00Z"
        }"#;
        let file: FileReference = serde_json::from_str(json).unwrap();
        assert_eq!(file.archive_id, None);
        assert_eq!(file.size, 0);
        assert!(file.description.is_empty());
    }
}
