//! Application setup and initialization

pub mod routes;
pub mod server;

use crate::auth::RolePermissions;
use crate::state::AppState;
use anyhow::{Context, Result};
use padbridge_core::Config;
use padbridge_storage::{create_file_store, FileStore};
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.is_production())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment(),
        "Configuration loaded and validated successfully"
    );

    let store = create_file_store(&config)
        .await
        .context("Failed to initialize file store")?;

    build_app(config, store)
}

/// Assemble state and routes around an existing file store.
pub fn build_app(
    config: Config,
    store: Arc<dyn FileStore>,
) -> Result<(Arc<AppState>, axum::Router)> {
    let permissions = Arc::new(RolePermissions::new(config.anonymous_can_view()));
    let state = Arc::new(AppState::new(config.clone(), store, permissions)?);
    let router = routes::setup_routes(&config, state.clone())?;
    Ok((state, router))
}
