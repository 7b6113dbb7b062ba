//! Data models for the bridge
//!
//! File metadata as the gallery stores it, the editor-facing document
//! classification, and the per-request edit session handed to the browser.

mod document_type;
mod file;
mod session;

pub use document_type::*;
pub use file::*;
pub use session::*;
