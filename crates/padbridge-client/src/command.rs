//! "Edit with CryptPad" file-browser command.
//!
//! Decides whether a selection can be opened in the collaborative editor and
//! builds the edit page URL for the first selected entry.

use crate::{ClientError, Notifier};
use padbridge_core::constants::EDIT_ENDPOINT;
use padbridge_core::models::SupportedFormat;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

pub const EDIT_COMMAND_NAME: &str = "editWithCryptPad";

static FILE_ID_IN_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"fileId[=/](\d+)").expect("static regex is valid"));

static FILE_BROWSER_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/elfinder.*$").expect("static regex is valid"));

/// Gallery data attached to a file-browser entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryData {
    #[serde(default)]
    pub file_id: Option<i64>,
    #[serde(default)]
    pub gallery_id: Option<i64>,
}

/// One file or directory as the file browser reports it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    #[serde(default)]
    pub mime: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub hash: String,
    #[serde(default)]
    pub data: EntryData,
}

impl FileEntry {
    /// Text after the last dot, or the whole name when it has none.
    fn has_supported_extension(&self) -> bool {
        let ext = self.name.rsplit('.').next().unwrap_or_default();
        SupportedFormat::from_extension(ext).is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandDescriptor {
    pub name: &'static str,
    pub title: &'static str,
    pub icon: &'static str,
    /// Shown in the toolbar
    pub toolbar: bool,
    /// Shown in the file context menu
    pub context_menu: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandState {
    Enabled,
    Disabled,
}

impl CommandState {
    /// File browser encoding: `0` enabled, `-1` disabled.
    pub fn as_code(&self) -> i32 {
        match self {
            CommandState::Enabled => 0,
            CommandState::Disabled => -1,
        }
    }
}

/// Commands known to a file browser instance plus its file context menu.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: Vec<CommandDescriptor>,
    context_menu: Vec<&'static str>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command. Returns `false` when it was already registered;
    /// the registry is left unchanged in that case.
    pub fn register_command(&mut self, descriptor: CommandDescriptor) -> bool {
        if self.get(descriptor.name).is_some() {
            return false;
        }
        if descriptor.context_menu && !self.context_menu.contains(&descriptor.name) {
            self.context_menu.push(descriptor.name);
        }
        tracing::debug!(command = descriptor.name, "Registered file browser command");
        self.commands.push(descriptor);
        true
    }

    pub fn get(&self, name: &str) -> Option<&CommandDescriptor> {
        self.commands.iter().find(|c| c.name == name)
    }

    pub fn context_menu_entries(&self) -> &[&'static str] {
        &self.context_menu
    }
}

/// What the command needs from the file browser and the page hosting it.
pub trait FileBrowserHost: Notifier {
    /// `scheme://host[:port]` of the hosting page
    fn page_origin(&self) -> String;
    /// Path of the hosting page
    fn page_path(&self) -> String;
    /// Directory currently shown, if any
    fn current_directory(&self) -> Option<FileEntry>;
    /// Open `url` in a new browsing context.
    fn open_in_new_context(&self, url: &str) -> Result<(), ClientError>;
    fn registry(&mut self) -> &mut CommandRegistry;
}

/// Explicit file id first, then a `fileId=<n>` or `fileId/<n>` in the entry URL.
pub fn resolve_file_id(entry: &FileEntry) -> Result<i64, ClientError> {
    if let Some(id) = entry.data.file_id.filter(|id| *id > 0) {
        return Ok(id);
    }
    entry
        .url
        .as_deref()
        .and_then(|url| FILE_ID_IN_URL.captures(url))
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<i64>().ok())
        .filter(|id| *id > 0)
        .ok_or(ClientError::MissingIdentifier)
}

/// Gallery of the entry, else of the current directory.
pub fn resolve_gallery_id(entry: &FileEntry, current_dir: Option<&FileEntry>) -> Option<i64> {
    entry
        .data
        .gallery_id
        .filter(|id| *id > 0)
        .or_else(|| current_dir.and_then(|dir| dir.data.gallery_id).filter(|id| *id > 0))
}

/// Edit page URL next to the page hosting the file browser.
pub fn build_edit_url(
    origin: &str,
    page_path: &str,
    file_id: i64,
    gallery_id: Option<i64>,
) -> String {
    let base = format!("{}{}", origin.trim_end_matches('/'), page_path);
    let base = FILE_BROWSER_SUFFIX.replace(&base, "");
    let mut url = format!("{}/{}?fileId={}", base, EDIT_ENDPOINT, file_id);
    if let Some(gallery_id) = gallery_id {
        url.push_str(&format!("&galleryId={}", gallery_id));
    }
    url.push_str("&edit=1");
    url
}

#[derive(Debug, Default, Clone, Copy)]
pub struct EditWithEditorCommand;

impl EditWithEditorCommand {
    pub fn descriptor() -> CommandDescriptor {
        CommandDescriptor {
            name: EDIT_COMMAND_NAME,
            title: "Edit with CryptPad",
            icon: "edit",
            toolbar: false,
            context_menu: true,
        }
    }

    /// Register with the host's file browser. Safe to call more than once.
    pub fn register(host: &mut dyn FileBrowserHost) -> bool {
        host.registry().register_command(Self::descriptor())
    }

    /// Enabled when any selected entry has a MIME type and a supported extension.
    pub fn get_state(selection: &[FileEntry]) -> CommandState {
        let supported = selection
            .iter()
            .any(|entry| entry.mime.is_some() && entry.has_supported_extension());
        if supported {
            CommandState::Enabled
        } else {
            CommandState::Disabled
        }
    }

    /// Open the edit page for the first selected entry. Returns the URL opened.
    pub fn exec(
        selection: &[FileEntry],
        host: &dyn FileBrowserHost,
    ) -> Result<String, ClientError> {
        let entry = selection.first().ok_or(ClientError::EmptySelection)?;

        let file_id = match resolve_file_id(entry) {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(name = %entry.name, hash = %entry.hash, "Could not determine fileId");
                host.alert(&e.to_string());
                return Err(e);
            }
        };

        let current_dir = host.current_directory();
        let gallery_id = resolve_gallery_id(entry, current_dir.as_ref());
        let url = build_edit_url(&host.page_origin(), &host.page_path(), file_id, gallery_id);

        tracing::info!(url = %url, "Opening collaborative editor");
        host.open_in_new_context(&url)?;
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeHost {
        registry: CommandRegistry,
        current_dir: Option<FileEntry>,
        alerts: Mutex<Vec<String>>,
        opened: Mutex<Vec<String>>,
    }

    impl Notifier for FakeHost {
        fn alert(&self, message: &str) {
            self.alerts.lock().unwrap().push(message.to_string());
        }
    }

    impl FileBrowserHost for FakeHost {
        fn page_origin(&self) -> String {
            "https://cms.example.org".to_string()
        }

        fn page_path(&self) -> String {
            "/tiki/elfinder/browse.php".to_string()
        }

        fn current_directory(&self) -> Option<FileEntry> {
            self.current_dir.clone()
        }

        fn open_in_new_context(&self, url: &str) -> Result<(), ClientError> {
            self.opened.lock().unwrap().push(url.to_string());
            Ok(())
        }

        fn registry(&mut self) -> &mut CommandRegistry {
            &mut self.registry
        }
    }

    fn entry(name: &str, mime: Option<&str>) -> FileEntry {
        FileEntry {
            name: name.to_string(),
            mime: mime.map(String::from),
            hash: "l1_abc".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_state_requires_mime_and_supported_extension() {
        assert_eq!(
            EditWithEditorCommand::get_state(&[]),
            CommandState::Disabled
        );
        assert_eq!(
            EditWithEditorCommand::get_state(&[entry("notes.txt", Some("text/plain"))]),
            CommandState::Disabled
        );
        assert_eq!(
            EditWithEditorCommand::get_state(&[entry("Report.docx", None)]),
            CommandState::Disabled
        );
        assert_eq!(
            EditWithEditorCommand::get_state(&[
                entry("notes.txt", Some("text/plain")),
                entry("Budget.XLSX", Some("application/octet-stream")),
            ]),
            CommandState::Enabled
        );
        assert_eq!(CommandState::Disabled.as_code(), -1);
    }

    #[test]
    fn test_name_without_dot_is_its_own_extension() {
        assert_eq!(
            EditWithEditorCommand::get_state(&[entry("docx", Some("application/octet-stream"))]),
            CommandState::Enabled
        );
        assert_eq!(
            EditWithEditorCommand::get_state(&[entry("README", Some("text/plain"))]),
            CommandState::Disabled
        );
        assert_eq!(
            EditWithEditorCommand::get_state(&[entry("archive.", Some("text/plain"))]),
            CommandState::Disabled
        );
    }

    #[test]
    fn test_resolve_file_id() {
        let mut e = entry("a.docx", Some("x"));
        e.data.file_id = Some(42);
        e.url = Some("tiki-download_file.php?fileId=7".to_string());
        assert_eq!(resolve_file_id(&e).unwrap(), 42);

        e.data.file_id = None;
        assert_eq!(resolve_file_id(&e).unwrap(), 7);

        e.url = Some("/dl/fileId/19/a.docx".to_string());
        assert_eq!(resolve_file_id(&e).unwrap(), 19);

        e.url = Some("/dl/a.docx".to_string());
        assert!(matches!(
            resolve_file_id(&e),
            Err(ClientError::MissingIdentifier)
        ));
    }

    #[test]
    fn test_resolve_gallery_id() {
        let mut e = entry("a.docx", Some("x"));
        let mut dir = entry("Docs", None);
        dir.data.gallery_id = Some(3);
        assert_eq!(resolve_gallery_id(&e, Some(&dir)), Some(3));
        e.data.gallery_id = Some(5);
        assert_eq!(resolve_gallery_id(&e, Some(&dir)), Some(5));
        e.data.gallery_id = None;
        assert_eq!(resolve_gallery_id(&e, None), None);
    }

    #[test]
    fn test_build_edit_url() {
        assert_eq!(
            build_edit_url("https://cms.example.org", "/tiki/elfinder/x.php", 42, Some(5)),
            "https://cms.example.org/tiki/tiki-edit_cryptpad.php?fileId=42&galleryId=5&edit=1"
        );
        assert_eq!(
            build_edit_url("https://cms.example.org", "/tiki", 42, None),
            "https://cms.example.org/tiki/tiki-edit_cryptpad.php?fileId=42&edit=1"
        );
    }

    #[test]
    fn test_exec_opens_edit_page() {
        let mut dir = entry("Docs", None);
        dir.data.gallery_id = Some(5);
        let host = FakeHost {
            current_dir: Some(dir),
            ..Default::default()
        };
        let mut e = entry("Report.docx", Some("x"));
        e.data.file_id = Some(42);

        let url = EditWithEditorCommand::exec(&[e], &host).unwrap();
        assert_eq!(
            url,
            "https://cms.example.org/tiki/tiki-edit_cryptpad.php?fileId=42&galleryId=5&edit=1"
        );
        assert_eq!(host.opened.lock().unwrap().as_slice(), &[url]);
    }

    #[test]
    fn test_exec_without_identifier_alerts_and_does_not_navigate() {
        let host = FakeHost::default();
        let result = EditWithEditorCommand::exec(&[entry("Report.docx", Some("x"))], &host);
        assert!(matches!(result, Err(ClientError::MissingIdentifier)));
        assert_eq!(host.alerts.lock().unwrap().len(), 1);
        assert!(host.opened.lock().unwrap().is_empty());

        assert!(matches!(
            EditWithEditorCommand::exec(&[], &host),
            Err(ClientError::EmptySelection)
        ));
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut host = FakeHost::default();
        assert!(EditWithEditorCommand::register(&mut host));
        assert!(!EditWithEditorCommand::register(&mut host));
        assert_eq!(host.registry.context_menu_entries(), &[EDIT_COMMAND_NAME]);
        assert!(host.registry.get(EDIT_COMMAND_NAME).is_some());
    }
}
