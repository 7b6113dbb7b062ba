pub mod feature_flags;
pub mod request_id;
pub mod security_headers;

pub use feature_flags::{feature_flags_middleware, FeatureFlags};
pub use request_id::{request_id_middleware, RequestId};
pub use security_headers::{security_headers_middleware, SecurityHeadersConfig};
