use crate::traits::{ByteStream, FileStore, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use chrono::Utc;
use futures::StreamExt;
use padbridge_core::models::{FileReference, FileReplacement, NewFile};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Metadata record persisted next to each content blob.
#[derive(Debug, Serialize, Deserialize)]
struct StoredRecord {
    #[serde(flatten)]
    file: FileReference,
    /// Name of the blob holding the current content; `None` until the first write
    #[serde(default)]
    blob: Option<String>,
}

/// Local filesystem file store
///
/// Layout under `base_path`: `{file_id}.json` holds the metadata record and
/// `{file_id}.{uuid}.bin` holds the content it points at. A replace writes a
/// fresh blob, then swaps the metadata with a rename, so readers always see a
/// consistent pair.
pub struct LocalFileStore {
    base_path: PathBuf,
    // Serializes id allocation and record creation
    init_lock: Mutex<()>,
    // Held across a replace's record swap and blob cleanup, and while a reader
    // resolves a record to an open blob
    blob_lock: Mutex<()>,
}

impl LocalFileStore {
    /// Create a new LocalFileStore rooted at `base_path` (created if missing)
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalFileStore {
            base_path,
            init_lock: Mutex::new(()),
            blob_lock: Mutex::new(()),
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn record_path(&self, file_id: i64) -> PathBuf {
        self.base_path.join(format!("{}.json", file_id))
    }

    fn blob_path(&self, blob: &str) -> PathBuf {
        self.base_path.join(blob)
    }

    async fn load_record(&self, file_id: i64) -> StorageResult<Option<StoredRecord>> {
        if file_id <= 0 {
            return Ok(None);
        }
        let path = self.record_path(file_id);
        let raw = match fs::read(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StorageError::ReadFailed(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };
        let record = serde_json::from_slice(&raw).map_err(|e| {
            StorageError::CorruptMetadata(format!("{}: {}", path.display(), e))
        })?;
        Ok(Some(record))
    }

    async fn require_record(&self, file_id: i64) -> StorageResult<StoredRecord> {
        self.load_record(file_id)
            .await?
            .ok_or_else(|| StorageError::NotFound(format!("file {}", file_id)))
    }

    /// Write `bytes` to `path` through a temporary sibling and a rename.
    async fn write_atomic(&self, path: &Path, bytes: &[u8]) -> StorageResult<()> {
        let tmp = path.with_extension(format!("{}.tmp", Uuid::new_v4()));

        let mut file = fs::File::create(&tmp).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to create {}: {}", tmp.display(), e))
        })?;
        file.write_all(bytes).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to write {}: {}", tmp.display(), e))
        })?;
        file.sync_all().await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to sync {}: {}", tmp.display(), e))
        })?;
        drop(file);

        if let Err(e) = fs::rename(&tmp, path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(StorageError::WriteFailed(format!(
                "Failed to move {} into place: {}",
                path.display(),
                e
            )));
        }
        Ok(())
    }

    async fn write_record(&self, record: &StoredRecord) -> StorageResult<()> {
        let bytes = serde_json::to_vec_pretty(record)
            .map_err(|e| StorageError::WriteFailed(format!("Failed to encode metadata: {}", e)))?;
        self.write_atomic(&self.record_path(record.file.file_id), &bytes)
            .await
    }

    async fn next_file_id(&self) -> StorageResult<i64> {
        let mut max_id = 0;
        let mut entries = fs::read_dir(&self.base_path).await?;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if let Some(id) = name
                .strip_suffix(".json")
                .and_then(|stem| stem.parse::<i64>().ok())
            {
                max_id = max_id.max(id);
            }
        }
        Ok(max_id + 1)
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn get_file_info(&self, file_id: i64) -> StorageResult<Option<FileReference>> {
        Ok(self.load_record(file_id).await?.map(|record| record.file))
    }

    async fn read(&self, file_id: i64) -> StorageResult<Vec<u8>> {
        let _guard = self.blob_lock.lock().await;
        let record = self.require_record(file_id).await?;
        let Some(blob) = record.blob else {
            return Ok(Vec::new());
        };
        let path = self.blob_path(&blob);
        fs::read(&path).await.map_err(|e| {
            StorageError::ReadFailed(format!("Failed to read {}: {}", path.display(), e))
        })
    }

    async fn read_stream(&self, file_id: i64) -> StorageResult<ByteStream> {
        let file = {
            let _guard = self.blob_lock.lock().await;
            let record = self.require_record(file_id).await?;
            let Some(blob) = record.blob else {
                return Ok(Box::pin(futures::stream::empty()));
            };
            let path = self.blob_path(&blob);
            // An open handle outlives a later unlink of the blob
            fs::File::open(&path).await.map_err(|e| {
                StorageError::ReadFailed(format!("Failed to open {}: {}", path.display(), e))
            })?
        };

        let stream = tokio_util::io::ReaderStream::new(file).map(|chunk| {
            chunk.map_err(|e| StorageError::ReadFailed(format!("Stream read error: {}", e)))
        });
        Ok(Box::pin(stream))
    }

    async fn exists(&self, file_id: i64) -> StorageResult<bool> {
        Ok(self.load_record(file_id).await?.is_some())
    }

    async fn init(&self, file_id: i64, params: NewFile) -> StorageResult<FileReference> {
        let _guard = self.init_lock.lock().await;

        let file_id = if file_id > 0 {
            if let Some(existing) = self.load_record(file_id).await? {
                return Ok(existing.file);
            }
            file_id
        } else {
            self.next_file_id().await?
        };

        let record = StoredRecord {
            file: FileReference {
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
            },
            blob: None,
        };
        self.write_record(&record).await?;

        tracing::info!(
            file_id,
            gallery_id = record.file.gallery_id,
            "File record initialised"
        );
        Ok(record.file)
    }

    async fn replace(
        &self,
        file_id: i64,
        replacement: FileReplacement,
    ) -> StorageResult<FileReference> {
        let start = std::time::Instant::now();
        let _guard = self.blob_lock.lock().await;
        let mut record = self.require_record(file_id).await?;
        let previous_blob = record.blob.take();

        let blob = format!("{}.{}.bin", file_id, Uuid::new_v4());
        let size = replacement.data.len();
        self.write_atomic(&self.blob_path(&blob), &replacement.data)
            .await?;

        record.file.name = replacement.name;
        record.file.filename = replacement.filename;
        record.file.mime_type = replacement.mime_type;
        record.file.size = size as u64;
        record.file.last_modified = Utc::now();
        record.blob = Some(blob.clone());

        if let Err(e) = self.write_record(&record).await {
            let _ = fs::remove_file(self.blob_path(&blob)).await;
            return Err(e);
        }

        if let Some(old) = previous_blob {
            if let Err(e) = fs::remove_file(self.blob_path(&old)).await {
                tracing::warn!(file_id, blob = %old, error = %e, "Failed to remove superseded blob");
            }
        }

        let duration = start.elapsed();
        tracing::info!(
            file_id,
            filename = %record.file.filename,
            size_bytes = size,
            duration_ms = duration.as_millis(),
            "File replaced in local store"
        );

        Ok(record.file)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
