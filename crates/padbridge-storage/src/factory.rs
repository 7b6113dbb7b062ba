use crate::{FileStore, LocalFileStore, MemoryFileStore, StorageBackend, StorageResult};
use padbridge_core::Config;
use std::sync::Arc;

/// Create a file store based on configuration
pub async fn create_file_store(config: &Config) -> StorageResult<Arc<dyn FileStore>> {
    match config.storage_backend() {
        StorageBackend::Local => {
            let store = LocalFileStore::new(config.local_storage_path()).await?;
            tracing::info!(path = %config.local_storage_path(), "Using local file store");
            Ok(Arc::new(store))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory file store; saved documents are lost on restart");
            Ok(Arc::new(MemoryFileStore::new()))
        }
    }
}
