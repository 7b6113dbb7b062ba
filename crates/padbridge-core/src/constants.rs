//! Paths and fixed values shared by the server, the client and the CLI.

/// Edit/view bootstrap page and save endpoint.
pub const EDIT_ENDPOINT: &str = "tiki-edit_cryptpad.php";

/// Token-authenticated raw file download used by the editor.
pub const IMPORT_ENDPOINT: &str = "tiki-cryptpad-import.php";

/// Gallery listing the cancel button returns to.
pub const GALLERY_LISTING_ENDPOINT: &str = "tiki-list_file_gallery.php";

/// Script served by every editor instance.
pub const EDITOR_API_SCRIPT: &str = "cryptpad-api.js";

/// Session tag passed to the editor entry point; also the DOM container id.
pub const EDITOR_SESSION_TAG: &str = "tiki_cryptpad";

/// Import token validity window.
pub const IMPORT_TOKEN_TTL_SECS: u64 = 7200;

pub const EDITOR_WIDTH: &str = "100%";
pub const EDITOR_HEIGHT: &str = "800px";
