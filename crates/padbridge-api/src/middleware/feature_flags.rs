use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use padbridge_core::{AppError, Config};
use std::sync::Arc;

/// Site features the bridge routes depend on
#[derive(Debug, Clone, Copy)]
pub struct FeatureFlags {
    pub cryptpad_docs: bool,
    pub file_galleries: bool,
}

impl FeatureFlags {
    pub fn from_config(config: &Config) -> Self {
        Self {
            cryptpad_docs: config.feature_cryptpad_docs(),
            file_galleries: config.feature_file_galleries(),
        }
    }

    /// Name of the first disabled feature, if any.
    pub fn first_disabled(&self) -> Option<&'static str> {
        if !self.cryptpad_docs {
            Some("feature_cryptpad_docs")
        } else if !self.file_galleries {
            Some("feature_file_galleries")
        } else {
            None
        }
    }
}

/// Reject every bridge request with 403 while a required feature is off
pub async fn feature_flags_middleware(
    State(flags): State<Arc<FeatureFlags>>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(feature) = flags.first_disabled() {
        return HttpAppError(AppError::FeatureDisabled(feature.to_string())).into_response();
    }
    next.run(request).await
}
