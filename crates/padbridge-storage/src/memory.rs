use crate::traits::{ByteStream, FileStore, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use padbridge_core::models::{FileReference, FileReplacement, NewFile};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct Entry {
    file: FileReference,
    data: Vec<u8>,
}

/// In-memory file store, used for development and tests.
///
/// The whole map sits behind one lock, so `replace` is atomic with respect to readers.
#[derive(Default)]
pub struct MemoryFileStore {
    entries: RwLock<HashMap<i64, Entry>>,
    last_id: AtomicI64,
}

impl MemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record with content, bypassing `init`.
    pub async fn insert(&self, file: FileReference, data: impl Into<Vec<u8>>) {
        self.last_id.fetch_max(file.file_id, Ordering::SeqCst);
        let mut entries = self.entries.write().await;
        entries.insert(
            file.file_id,
            Entry {
                file,
                data: data.into(),
            },
        );
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl FileStore for MemoryFileStore {
    async fn get_file_info(&self, file_id: i64) -> StorageResult<Option<FileReference>> {
        let entries = self.entries.read().await;
        Ok(entries.get(&file_id).map(|entry| entry.file.clone()))
    }

    async fn read(&self, file_id: i64) -> StorageResult<Vec<u8>> {
        let entries = self.entries.read().await;
        entries
            .get(&file_id)
            .map(|entry| entry.data.clone())
            .ok_or_else(|| StorageError::NotFound(format!("file {}", file_id)))
    }

    async fn read_stream(&self, file_id: i64) -> StorageResult<ByteStream> {
        let data = self.read(file_id).await?;
        Ok(Box::pin(futures::stream::once(async move {
            Ok(Bytes::from(data))
        })))
    }

    async fn exists(&self, file_id: i64) -> StorageResult<bool> {
        Ok(self.entries.read().await.contains_key(&file_id))
    }

    async fn init(&self, file_id: i64, params: NewFile) -> StorageResult<FileReference> {
        let mut entries = self.entries.write().await;

        let file_id = if file_id > 0 {
            if let Some(existing) = entries.get(&file_id) {
                return Ok(existing.file.clone());
            }
            self.last_id.fetch_max(file_id, Ordering::SeqCst);
            file_id
        } else {
            self.last_id.fetch_add(1, Ordering::SeqCst) + 1
        };

        let file = FileReference {
            file_id,
            gallery_id: params.gallery_id,
            name: String::new(),
            filename: String::new(),
            mime_type: String::new(),
            archive_id: None,
            description: params.description,
            owner: params.owner,
            size: 0,
            last_modified: Utc::now(),
        };
        entries.insert(
            file_id,
            Entry {
                file: file.clone(),
                data: Vec::new(),
            },
        );
        tracing::debug!(file_id, "File record initialised in memory");
        Ok(file)
    }

    async fn replace(
        &self,
        file_id: i64,
        replacement: FileReplacement,
    ) -> StorageResult<FileReference> {
        let mut entries = self.entries.write().await;
        let entry = entries
            .get_mut(&file_id)
            .ok_or_else(|| StorageError::NotFound(format!("file {}", file_id)))?;

        entry.file.name = replacement.name;
        entry.file.filename = replacement.filename;
        entry.file.mime_type = replacement.mime_type;
        entry.file.size = replacement.data.len() as u64;
        entry.file.last_modified = Utc::now();
        entry.data = replacement.data;

        tracing::debug!(file_id, size_bytes = entry.file.size, "File replaced in memory");
        Ok(entry.file.clone())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}
