//! Save flow driven by the editor's save callback.
//!
//! The document is base64-encoded and posted once to the save endpoint. The
//! editor's completion callback learns the outcome; failures also alert the
//! user. There is no retry.

use crate::{ClientError, EditorClient, Notifier};
use base64::Engine;
use std::path::Path;
use std::sync::Arc;

/// Where a save lands: the gallery file and the name/format to store it under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveTarget {
    /// `0` creates a new file in `gallery_id`
    pub file_id: i64,
    pub gallery_id: Option<i64>,
    pub name: String,
    pub format: String,
}

impl SaveTarget {
    fn form(&self, data: String) -> Vec<(&'static str, String)> {
        let mut form = vec![
            ("fileId", self.file_id.to_string()),
            ("data", data),
            ("name", self.name.clone()),
            ("format", self.format.clone()),
        ];
        if let Some(gallery_id) = self.gallery_id {
            form.push(("galleryId", gallery_id.to_string()));
        }
        form
    }
}

pub struct SaveHandler {
    client: EditorClient,
    target: SaveTarget,
    notifier: Arc<dyn Notifier>,
}

impl SaveHandler {
    pub fn new(client: EditorClient, target: SaveTarget, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            client,
            target,
            notifier,
        }
    }

    pub fn target(&self) -> &SaveTarget {
        &self.target
    }

    /// Save `document` and report the outcome to `completion`: `None` on
    /// success, the failure otherwise.
    pub async fn on_save<F>(&self, document: &[u8], completion: F) -> Result<i64, ClientError>
    where
        F: FnOnce(Option<&ClientError>),
    {
        let data = base64::engine::general_purpose::STANDARD.encode(document);
        let result = self.client.post_save(&self.target.form(data)).await;
        self.finish(result, completion)
    }

    /// Read a local file and save it.
    pub async fn on_save_file<F>(&self, path: &Path, completion: F) -> Result<i64, ClientError>
    where
        F: FnOnce(Option<&ClientError>),
    {
        match tokio::fs::read(path).await {
            Ok(document) => self.on_save(&document, completion).await,
            Err(e) => self.finish(
                Err(ClientError::SaveConversionFailure(format!(
                    "{}: {}",
                    path.display(),
                    e
                ))),
                completion,
            ),
        }
    }

    fn finish<F>(&self, result: Result<i64, ClientError>, completion: F) -> Result<i64, ClientError>
    where
        F: FnOnce(Option<&ClientError>),
    {
        match &result {
            Ok(file_id) => {
                tracing::info!(file_id, "Document saved");
                completion(None);
            }
            Err(e) => {
                tracing::error!(error = %e, file_id = self.target.file_id, "Save failed");
                completion(Some(e));
                self.notifier.alert(&format!("Error saving document: {}", e));
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNotifier {
        alerts: Mutex<Vec<String>>,
    }

    impl Notifier for RecordingNotifier {
        fn alert(&self, message: &str) {
            self.alerts.lock().unwrap().push(message.to_string());
        }
    }

    fn target() -> SaveTarget {
        SaveTarget {
            file_id: 42,
            gallery_id: Some(5),
            name: "Report".to_string(),
            format: "docx".to_string(),
        }
    }

    #[tokio::test]
    async fn test_save_posts_base64_once() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/tiki-edit_cryptpad.php")
            .match_header("authorization", "Bearer session-token")
            .match_body(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("fileId".into(), "42".into()),
                mockito::Matcher::UrlEncoded("data".into(), "QUJD".into()),
                mockito::Matcher::UrlEncoded("name".into(), "Report".into()),
                mockito::Matcher::UrlEncoded("format".into(), "docx".into()),
                mockito::Matcher::UrlEncoded("galleryId".into(), "5".into()),
            ]))
            .with_status(200)
            .with_body("42")
            .expect(1)
            .create_async()
            .await;

        let client = EditorClient::new(&server.url(), Some("session-token".to_string())).unwrap();
        let notifier = Arc::new(RecordingNotifier::default());
        let handler = SaveHandler::new(client, target(), notifier.clone());

        let mut outcome = None;
        let file_id = handler
            .on_save(b"ABC", |failure| outcome = Some(failure.is_none()))
            .await
            .unwrap();

        assert_eq!(file_id, 42);
        assert_eq!(outcome, Some(true));
        assert!(notifier.alerts.lock().unwrap().is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_failed_save_reports_and_alerts_without_retry() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/tiki-edit_cryptpad.php")
            .with_status(500)
            .with_body(r#"{"error":"Storage error","code":"STORAGE_ERROR"}"#)
            .expect(1)
            .create_async()
            .await;

        let client = EditorClient::new(&server.url(), None).unwrap();
        let notifier = Arc::new(RecordingNotifier::default());
        let handler = SaveHandler::new(client, target(), notifier.clone());

        let mut failed = false;
        let result = handler
            .on_save(b"ABC", |failure| failed = failure.is_some())
            .await;

        assert!(matches!(result, Err(ClientError::SaveTransportFailure(_))));
        assert!(failed);
        assert_eq!(notifier.alerts.lock().unwrap().len(), 1);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unreadable_file_is_a_conversion_failure() {
        let client = EditorClient::new("http://127.0.0.1:9", None).unwrap();
        let notifier = Arc::new(RecordingNotifier::default());
        let handler = SaveHandler::new(client, target(), notifier.clone());

        let dir = tempfile::tempdir().unwrap();
        let result = handler
            .on_save_file(&dir.path().join("missing.docx"), |_| {})
            .await;

        assert!(matches!(result, Err(ClientError::SaveConversionFailure(_))));
        assert_eq!(notifier.alerts.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_new_document_form_omits_missing_gallery() {
        let target = SaveTarget {
            file_id: 0,
            gallery_id: None,
            name: "Minutes".to_string(),
            format: "odt".to_string(),
        };
        let form = target.form("QUJD".to_string());
        assert!(form.iter().all(|(key, _)| *key != "galleryId"));
        assert!(form.contains(&("fileId", "0".to_string())));
    }
}
