//! padbridge API library
//!
//! HTTP handlers, middleware and application setup for the gallery/editor bridge.

pub mod auth;
pub mod bootstrap;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod setup;
pub mod state;
pub mod telemetry;
pub mod utils;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
