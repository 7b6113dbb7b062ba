//! Application state shared by every handler.

use crate::auth::PermissionResolver;
use crate::bootstrap::PageRenderer;
use padbridge_core::Config;
use padbridge_storage::FileStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// File gallery gateway
    pub store: Arc<dyn FileStore>,
    pub permissions: Arc<dyn PermissionResolver>,
    pub pages: Arc<PageRenderer>,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn FileStore>,
        permissions: Arc<dyn PermissionResolver>,
    ) -> Result<Self, anyhow::Error> {
        let pages = PageRenderer::new()
            .map_err(|e| anyhow::anyhow!("Failed to load page templates: {}", e))?;
        Ok(Self {
            config,
            store,
            permissions,
            pages: Arc::new(pages),
        })
    }
}
