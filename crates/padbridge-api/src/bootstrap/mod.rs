//! Edit/view page rendering
//!
//! The page is rendered with minijinja from an embedded template. Session data
//! travels as a JSON data block read by the static bootstrap script, so the
//! page itself carries no inline executable code.

use minijinja::{context, default_auto_escape_callback, Environment};
use padbridge_core::models::EditSession;
use padbridge_core::AppError;

pub mod assets;

const EDIT_SESSION_TEMPLATE: &str = "edit_session.html";

/// Relative URLs of the static assets, served next to the edit endpoint.
pub const BOOTSTRAP_SCRIPT_PATH: &str = "padbridge/bootstrap.js";
pub const STYLESHEET_PATH: &str = "padbridge/edit_session.css";

pub struct PageRenderer {
    env: Environment<'static>,
}

impl PageRenderer {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(default_auto_escape_callback);
        env.add_template(
            EDIT_SESSION_TEMPLATE,
            include_str!("../../templates/edit_session.html"),
        )?;
        Ok(Self { env })
    }

    /// Page for a configured editor: one script tag for the editor library
    /// plus the session data block.
    pub fn render_session(
        &self,
        session: &EditSession,
        editor_script_url: &str,
    ) -> Result<String, AppError> {
        let session_json = serde_json::to_string(session)
            .map_err(|e| AppError::Internal(format!("Failed to encode session: {}", e)))?;

        self.render(context! {
            title => &session.display_name,
            missing_package => false,
            mode => session.mode.as_str(),
            gallery_id => session.gallery_id,
            session_tag => &session.session_tag,
            session_json => escape_json_for_html(&session_json),
            editor_script_url => editor_script_url,
            bootstrap_script_url => BOOTSTRAP_SCRIPT_PATH,
            stylesheet_url => STYLESHEET_PATH,
        })
    }

    /// Degraded page shown when no editor is configured.
    pub fn render_missing_package(&self, display_name: &str) -> Result<String, AppError> {
        self.render(context! {
            title => display_name,
            missing_package => true,
            stylesheet_url => STYLESHEET_PATH,
        })
    }

    fn render(&self, ctx: minijinja::Value) -> Result<String, AppError> {
        let template = self
            .env
            .get_template(EDIT_SESSION_TEMPLATE)
            .map_err(|e| AppError::Internal(format!("Template lookup failed: {}", e)))?;
        template.render(ctx).map_err(|e| {
            tracing::error!(error = %e, "Failed to render edit page");
            AppError::Internal(format!("Template rendering failed: {}", e))
        })
    }
}

/// Make serialized JSON safe inside a `<script>` element.
///
/// `<`, `>` and `&` become JSON unicode escapes, so the block can never close
/// its element early; the parsed value is unchanged.
pub fn escape_json_for_html(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use padbridge_core::models::{
        DocumentTypeClass, EditorPolling, EditorUser, SessionMode,
    };

    fn session(mode: SessionMode, display_name: &str) -> EditSession {
        EditSession {
            file_id: 42,
            gallery_id: 5,
            import_url: Some("http://localhost:3000/tiki-cryptpad-import.php?data=t".to_string()),
            document_type: DocumentTypeClass::Sheet,
            file_extension: "xlsx".to_string(),
            editor_base_url: "https://pad.example.com".to_string(),
            display_name: display_name.to_string(),
            save_name: display_name.to_string(),
            mode,
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
        }
    }

    #[test]
    fn test_escape_json_for_html() {
        let escaped = escape_json_for_html(r#"{"name":"</script><b>&"}"#);
        assert!(!escaped.contains('<'));
        assert!(!escaped.contains('&'));
        let value: serde_json::Value = serde_json::from_str(&escaped).unwrap();
        assert_eq!(value["name"], "</script><b>&");
    }

    #[test]
    fn test_edit_page_has_single_editor_script() {
        let renderer = PageRenderer::new().unwrap();
        let html = renderer
            .render_session(
                &session(SessionMode::Edit, "Budget"),
                "https://pad.example.com/cryptpad-api.js",
            )
            .unwrap();
        assert_eq!(html.matches("cryptpad-api.js").count(), 1);
        assert!(html.contains("saveButton"));
        assert!(html.contains("cancelButton"));
        assert!(html.contains(r#"id="tiki_cryptpad""#));
    }

    #[test]
    fn test_view_page_has_no_save_controls() {
        let renderer = PageRenderer::new().unwrap();
        let html = renderer
            .render_session(
                &session(SessionMode::View, "Budget"),
                "https://pad.example.com/cryptpad-api.js",
            )
            .unwrap();
        assert!(!html.contains("saveButton"));
        assert!(html.contains(r#""mode":"view""#));
    }

    #[test]
    fn test_display_name_is_escaped() {
        let renderer = PageRenderer::new().unwrap();
        let html = renderer
            .render_session(
                &session(SessionMode::Edit, "<img src=x onerror=alert(1)>"),
                "https://pad.example.com/cryptpad-api.js",
            )
            .unwrap();
        assert!(!html.contains("<img src=x"));
        assert!(html.contains("&lt;img"));
    }

    #[test]
    fn test_missing_package_page() {
        let renderer = PageRenderer::new().unwrap();
        let html = renderer.render_missing_package("Report").unwrap();
        assert!(!html.contains("cryptpad-api.js"));
        assert!(!html.contains("<script"));
        assert!(html.contains("not configured"));
    }
}
