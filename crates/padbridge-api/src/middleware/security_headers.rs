use axum::http::{header, HeaderValue};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Security headers configuration
#[derive(Clone)]
pub struct SecurityHeadersConfig {
    /// Origin of the collaborative editor, allowed to serve scripts and frames
    pub editor_origin: Option<String>,
    pub is_production: bool,
}

impl SecurityHeadersConfig {
    pub fn new(editor_base_url: Option<&str>, is_production: bool) -> Self {
        Self {
            editor_origin: editor_base_url.and_then(origin_of),
            is_production,
        }
    }

    /// Build Content-Security-Policy header value
    fn build_csp(&self) -> String {
        let extra = self
            .editor_origin
            .as_deref()
            .map(|origin| format!(" {}", origin))
            .unwrap_or_default();

        [
            "default-src 'self'".to_string(),
            format!("script-src 'self'{}", extra),
            "style-src 'self'".to_string(),
            "img-src 'self' data: https:".to_string(),
            "font-src 'self' data:".to_string(),
            format!("connect-src 'self'{}", extra),
            format!("frame-src 'self'{}", extra),
            "frame-ancestors 'none'".to_string(),
        ]
        .join("; ")
    }
}

/// `scheme://host[:port]` of an absolute URL.
pub fn origin_of(url: &str) -> Option<String> {
    let (scheme, rest) = url.split_once("://")?;
    let authority = rest.split(['/', '?', '#']).next()?;
    if authority.is_empty() {
        return None;
    }
    Some(format!("{}://{}", scheme, authority))
}

/// Security headers middleware
/// Adds security headers to all HTTP responses
pub async fn security_headers_middleware(
    State(config): State<Arc<SecurityHeadersConfig>>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();

    headers.insert(
        "X-Content-Type-Options",
        HeaderValue::from_static("nosniff"),
    );

    // Redundant with frame-ancestors, kept for older browsers
    headers.insert("X-Frame-Options", HeaderValue::from_static("DENY"));

    headers.insert(
        "Referrer-Policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    if config.is_production {
        headers.insert(
            "Strict-Transport-Security",
            HeaderValue::from_static("max-age=31536000; includeSubDomains"),
        );
    }

    let csp = config.build_csp();
    if let Ok(header_value) = HeaderValue::from_str(&csp) {
        headers.insert("Content-Security-Policy", header_value);
    }

    headers.insert(
        "Permissions-Policy",
        HeaderValue::from_static("geolocation=(), microphone=(), camera=()"),
    );

    // Handlers that set their own caching policy keep it
    if !headers.contains_key(header::CACHE_CONTROL) {
        headers.insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store, private"),
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_of() {
        assert_eq!(
            origin_of("https://pad.example.com/sub/path"),
            Some("https://pad.example.com".to_string())
        );
        assert_eq!(
            origin_of("http://localhost:3001"),
            Some("http://localhost:3001".to_string())
        );
        assert_eq!(origin_of("pad.example.com"), None);
    }

    #[test]
    fn test_csp_allows_editor_origin() {
        let config = SecurityHeadersConfig::new(Some("https://pad.example.com/"), false);
        let csp = config.build_csp();
        assert!(csp.contains("script-src 'self' https://pad.example.com;"));
        assert!(csp.contains("frame-src 'self' https://pad.example.com"));

        let degraded = SecurityHeadersConfig::new(None, false).build_csp();
        assert!(degraded.contains("script-src 'self';"));
    }
}
