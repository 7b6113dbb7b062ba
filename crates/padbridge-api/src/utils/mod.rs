pub mod import_token;
pub mod serde_helpers;
