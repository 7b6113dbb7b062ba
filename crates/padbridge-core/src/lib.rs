//! padbridge core library
//!
//! Domain models, error types, configuration and validation shared by the
//! bridge server, the storage backends and the client.

pub mod config;
pub mod constants;
pub mod error;
pub mod mime;
pub mod models;
pub mod storage_types;
pub mod validation;

// Re-export commonly used types
pub use config::{BaseConfig, BridgeConfig, Config};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use storage_types::StorageBackend;
