//! Route configuration and setup.
//!
//! Bridge routes sit behind the feature flag gate; health checks live in [health](health).

mod health;

use crate::auth::{identity_middleware, AuthState};
use crate::bootstrap::{assets, BOOTSTRAP_SCRIPT_PATH, STYLESHEET_PATH};
use crate::handlers::{edit_session::edit_session, import::import_document, save::save_document};
use crate::middleware::{
    feature_flags_middleware, request_id_middleware, security_headers::origin_of,
    security_headers_middleware, FeatureFlags, SecurityHeadersConfig,
};
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::get,
    Router,
};
use padbridge_core::constants::{EDIT_ENDPOINT, IMPORT_ENDPOINT};
use padbridge_core::Config;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Form fields other than the base64 payload.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Largest urlencoded save form a document of `max_document_bytes` can produce.
///
/// Base64 turns every 3 bytes into 4 characters, and the form encoding can
/// expand each of those (`+`, `/`, `=`) to a 3-byte `%XX` escape. The decoded
/// size check in the save handler stays the real limit.
fn transport_body_limit(max_document_bytes: usize) -> usize {
    max_document_bytes
        .div_ceil(3)
        .saturating_mul(4 * 3)
        .saturating_add(FORM_OVERHEAD_BYTES)
}

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;
    let auth_state = Arc::new(AuthState::new(config.jwt_secret()));
    let feature_flags = Arc::new(FeatureFlags::from_config(config));

    let session_routes = Router::new()
        .route(
            &format!("/{}", EDIT_ENDPOINT),
            get(edit_session).post(save_document),
        )
        .layer(from_fn_with_state(auth_state, identity_middleware));

    let bridge_routes = Router::new()
        .route(&format!("/{}", IMPORT_ENDPOINT), get(import_document))
        .merge(session_routes)
        .layer(from_fn_with_state(feature_flags, feature_flags_middleware));

    let asset_routes = Router::new()
        .route(
            &format!("/{}", BOOTSTRAP_SCRIPT_PATH),
            get(assets::bootstrap_script),
        )
        .route(&format!("/{}", STYLESHEET_PATH), get(assets::stylesheet));

    let health_routes = Router::new()
        .route("/health", get(health::liveness_check))
        .route("/health/ready", get(health::readiness_check));

    let security_headers_config = Arc::new(SecurityHeadersConfig::new(
        config.cryptpad_base_url(),
        config.is_production(),
    ));

    let body_limit = transport_body_limit(config.max_document_size_bytes());
    tracing::info!(body_limit_bytes = body_limit, "Request body limit layer enabled");

    let app = bridge_routes
        .merge(asset_routes)
        .merge(health_routes)
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(from_fn_with_state(
            security_headers_config,
            security_headers_middleware,
        ))
        .with_state(state);

    Ok(app)
}

/// The editor fetches documents through the import route from its own origin.
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    let Some(editor_url) = config.cryptpad_base_url() else {
        return Ok(cors);
    };
    let origin = origin_of(editor_url)
        .ok_or_else(|| anyhow::anyhow!("Cannot derive an origin from editor URL {}", editor_url))?;
    let origin: HeaderValue = origin
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid editor origin {}: {}", origin, e))?;
    tracing::info!(origin = ?origin, "CORS enabled for editor origin");

    Ok(cors.allow_origin(origin))
}
