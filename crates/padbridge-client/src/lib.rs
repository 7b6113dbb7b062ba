//! Client side of the gallery/editor bridge.
//!
//! Holds the file-browser "Edit with CryptPad" command, the save flow the
//! embedded editor's save callback drives, and a small HTTP client for the
//! bridge endpoints. The `padbridge` CLI uses this crate directly.

pub mod command;
pub mod save;

use padbridge_core::constants::EDIT_ENDPOINT;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

pub use command::{
    build_edit_url, resolve_file_id, resolve_gallery_id, CommandDescriptor, CommandRegistry,
    CommandState, EditWithEditorCommand, EntryData, FileBrowserHost, FileEntry,
};
pub use save::{SaveHandler, SaveTarget};

const DEFAULT_BRIDGE_URL: &str = "http://localhost:3000";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Could not determine file ID. Please check file selection.")]
    MissingIdentifier,

    #[error("No file selected")]
    EmptySelection,

    #[error("Failed to prepare document for saving: {0}")]
    SaveConversionFailure(String),

    #[error("Failed to save document: {0}")]
    SaveTransportFailure(String),

    #[error("Collaborative editor is not available: {0}")]
    EditorUnavailable(String),

    #[error("Failed to open {url}: {reason}")]
    OpenFailed { url: String, reason: String },
}

/// Shows a blocking message to the user (a browser alert, a CLI stderr line).
pub trait Notifier: Send + Sync {
    fn alert(&self, message: &str);
}

/// HTTP client for the bridge endpoints.
#[derive(Clone, Debug)]
pub struct EditorClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl EditorClient {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| ClientError::SaveTransportFailure(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
        })
    }

    /// Create client from environment: PADBRIDGE_URL and optional PADBRIDGE_TOKEN.
    pub fn from_env() -> Result<Self, ClientError> {
        let base_url =
            std::env::var("PADBRIDGE_URL").unwrap_or_else(|_| DEFAULT_BRIDGE_URL.to_string());
        let token = std::env::var("PADBRIDGE_TOKEN").ok();
        Self::new(&base_url, token)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn edit_endpoint_url(&self) -> String {
        format!("{}/{}", self.base_url, EDIT_ENDPOINT)
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.header("Authorization", format!("Bearer {}", token)),
            None => request,
        }
    }

    /// POST a save form. Returns the file id the bridge answered with.
    pub async fn post_save(&self, form: &[(&str, String)]) -> Result<i64, ClientError> {
        let request = self.apply_auth(self.client.post(self.edit_endpoint_url()).form(form));

        let response = request
            .send()
            .await
            .map_err(|e| ClientError::SaveTransportFailure(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::SaveTransportFailure(e.to_string()))?;

        if !status.is_success() {
            return Err(ClientError::SaveTransportFailure(format!(
                "status {}: {}",
                status, body
            )));
        }

        body.trim().parse::<i64>().map_err(|_| {
            ClientError::SaveTransportFailure(format!("unexpected response body: {}", body))
        })
    }

    /// Fetch the edit page and check that it embeds an editor session.
    pub async fn check_editor(&self, file_id: i64) -> Result<(), ClientError> {
        let request = self.apply_auth(
            self.client
                .get(self.edit_endpoint_url())
                .query(&[("fileId", file_id.to_string())]),
        );
        let response = request
            .send()
            .await
            .map_err(|e| ClientError::EditorUnavailable(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::EditorUnavailable(format!(
                "status {}: {}",
                status, body
            )));
        }

        let html = response
            .text()
            .await
            .map_err(|e| ClientError::EditorUnavailable(e.to_string()))?;
        if html.contains("padbridge-session") {
            Ok(())
        } else {
            Err(ClientError::EditorUnavailable(
                "editor is not configured on this site".to_string(),
            ))
        }
    }
}
