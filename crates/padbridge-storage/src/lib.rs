//! padbridge storage library
//!
//! The file gallery gateway used by the bridge: the `FileStore` trait, a
//! local filesystem backend and an in-memory backend.
//!
//! Files are addressed by their numeric gallery id. A record may point at a
//! canonical archived version through `archive_id`; `resolve_canonical`
//! applies that redirect once.

pub mod factory;
pub mod local;
pub mod memory;
pub mod traits;

// Re-export commonly used types
pub use factory::create_file_store;
pub use local::LocalFileStore;
pub use memory::MemoryFileStore;
pub use padbridge_core::StorageBackend;
pub use traits::{resolve_canonical, ByteStream, FileStore, StorageError, StorageResult};
