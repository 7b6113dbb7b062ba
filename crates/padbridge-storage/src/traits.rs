//! File store gateway trait
//!
//! This module defines the FileStore trait that every gallery backend must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use padbridge_core::models::{FileReference, FileReplacement, NewFile};
use std::pin::Pin;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Corrupt metadata: {0}")]
    CorruptMetadata(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Byte stream returned by `FileStore::read_stream`
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>;

/// File store gateway
///
/// The narrow interface the bridge needs from a file gallery: metadata lookup
/// by id, content reads, record initialisation and whole-file replacement.
/// `replace` must be atomic: a concurrent reader sees either the previous
/// content and metadata or the new ones, never a mix. Of concurrent replaces
/// the last one to complete wins and leaves no trace of the others.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Metadata for `file_id`, or `None` when no such file exists.
    async fn get_file_info(&self, file_id: i64) -> StorageResult<Option<FileReference>>;

    /// Whole content of a file.
    async fn read(&self, file_id: i64) -> StorageResult<Vec<u8>>;

    /// Content of a file as a stream of chunks (for large documents).
    async fn read_stream(&self, file_id: i64) -> StorageResult<ByteStream>;

    /// Check if a file record exists
    async fn exists(&self, file_id: i64) -> StorageResult<bool>;

    /// Create an empty record.
    ///
    /// A positive `file_id` is used as is; zero or negative allocates the next free id.
    async fn init(&self, file_id: i64, params: NewFile) -> StorageResult<FileReference>;

    /// Replace content, MIME type, display name and stored filename of an
    /// existing record in one step.
    async fn replace(
        &self,
        file_id: i64,
        replacement: FileReplacement,
    ) -> StorageResult<FileReference>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}

/// Look a file up and follow its archive linkage once.
///
/// Edits always land on the canonical archived version, so every caller that
/// validates, names or writes a file goes through here first. When the archive
/// target is missing the original record is returned.
pub async fn resolve_canonical(
    store: &dyn FileStore,
    file_id: i64,
) -> StorageResult<Option<FileReference>> {
    if file_id <= 0 {
        return Ok(None);
    }
    let Some(file) = store.get_file_info(file_id).await? else {
        return Ok(None);
    };
    match file.redirect_target() {
        Some(target) => {
            tracing::debug!(file_id, archive_id = target, "Following archive linkage");
            match store.get_file_info(target).await? {
                Some(archived) => Ok(Some(archived)),
                None => {
                    tracing::warn!(file_id, archive_id = target, "Archive target missing");
                    Ok(Some(file))
                }
            }
        }
        None => Ok(Some(file)),
    }
}
