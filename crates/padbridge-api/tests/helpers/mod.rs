//! Test helpers: build the bridge router over an in-memory gallery.
//!
//! Run from workspace root: `cargo test -p padbridge-api`.

#![allow(dead_code)]

use axum_test::TestServer;
use chrono::Utc;
use padbridge_api::auth::{issue_session_token, UserRole};
use padbridge_api::setup::build_app;
use padbridge_core::models::FileReference;
use padbridge_core::{BridgeConfig, Config};
use padbridge_storage::MemoryFileStore;
use std::collections::HashMap;
use std::sync::Arc;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-at-least-32-characters-long";
pub const EDITOR_URL: &str = "https://pad.example.com/";
pub const PUBLIC_URL: &str = "https://cms.example.org/";

pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Test application: server plus the gallery behind it.
pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<MemoryFileStore>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Bearer header value for a signed-in user.
    pub fn bearer(&self, user: &str, role: UserRole) -> String {
        let token = issue_session_token(TEST_JWT_SECRET, user, role, 1)
            .expect("Failed to issue session token");
        format!("Bearer {}", token)
    }
}

/// Configuration with the editor enabled; `overrides` replace or add keys.
pub fn test_config(overrides: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = [
        ("JWT_SECRET", TEST_JWT_SECRET),
        ("CRYPTPAD_BASE_URL", EDITOR_URL),
        ("PUBLIC_BASE_URL", PUBLIC_URL),
        ("STORAGE_BACKEND", "memory"),
        ("ENVIRONMENT", "test"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    for (key, value) in overrides {
        vars.insert(key.to_string(), value.to_string());
    }
    let config = BridgeConfig::from_lookup(|key| vars.get(key).cloned())
        .expect("Failed to build test config");
    config.validate().expect("Test config must validate");
    Config::new(config)
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(&[]).await
}

pub async fn setup_test_app_with(overrides: &[(&str, &str)]) -> TestApp {
    let store = Arc::new(MemoryFileStore::new());
    let (_state, router) =
        build_app(test_config(overrides), store.clone()).expect("Failed to build app");
    let server = TestServer::new(router).expect("Failed to create test server");
    TestApp { server, store }
}

pub fn file_reference(file_id: i64, gallery_id: i64, filename: &str, mime_type: &str) -> FileReference {
    let name = filename
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(filename)
        .to_string();
    FileReference {
        file_id,
        gallery_id,
        name,
        filename: filename.to_string(),
        mime_type: mime_type.to_string(),
        archive_id: None,
        description: String::new(),
        owner: None,
        size: 0,
        last_modified: Utc::now(),
    }
}

/// Seed `Report.docx` as file 42 in gallery 5.
pub async fn seed_report(app: &TestApp) -> FileReference {
    let file = file_reference(42, 5, "Report.docx", DOCX_MIME);
    app.store.insert(file.clone(), b"original".to_vec()).await;
    file
}

/// The session JSON block embedded in an edit page.
pub fn session_json(html: &str) -> serde_json::Value {
    let marker = r#"<script type="application/json" id="padbridge-session">"#;
    let start = html.find(marker).expect("session block missing") + marker.len();
    let end = start + html[start..].find("</script>").expect("unterminated session block");
    serde_json::from_str(&html[start..end]).expect("session block is not JSON")
}
