pub mod middleware;
pub mod models;
pub mod permissions;

pub use middleware::{identity_middleware, issue_session_token, AuthState};
pub use models::{Identity, JwtClaims, RequestContext, UserRole};
pub use permissions::{ensure_file_access, Permission, PermissionResolver, RolePermissions};
