use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use padbridge_core::models::EditorUser;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Gallery role carried by a session token
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Member,
    Viewer,
}

impl Display for UserRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            UserRole::Admin => write!(f, "admin"),
            UserRole::Member => write!(f, "member"),
            UserRole::Viewer => write!(f, "viewer"),
        }
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(UserRole::Admin),
            "member" => Ok(UserRole::Member),
            "viewer" => Ok(UserRole::Viewer),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,  // user name
    pub role: String, // "admin", "member", or "viewer"
    pub exp: i64,     // expiration timestamp
    pub iat: i64,     // issued at timestamp
}

/// Caller identity resolved by the identity middleware and stored in request extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Anonymous,
    User { name: String, role: UserRole },
}

impl Identity {
    pub fn user_name(&self) -> Option<&str> {
        match self {
            Identity::Anonymous => None,
            Identity::User { name, .. } => Some(name),
        }
    }

    pub fn role(&self) -> Option<UserRole> {
        match self {
            Identity::Anonymous => None,
            Identity::User { role, .. } => Some(*role),
        }
    }

    /// How this caller appears to collaborators inside the editor.
    pub fn editor_user(&self) -> EditorUser {
        match self.user_name() {
            Some(name) => EditorUser::named(name),
            None => EditorUser::anonymous(),
        }
    }
}

/// Per-request context threaded explicitly through the handlers.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub identity: Identity,
    pub request_id: Option<String>,
}

// Handlers outside the identity middleware see an anonymous caller.
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let identity = parts
            .extensions
            .get::<Identity>()
            .cloned()
            .unwrap_or(Identity::Anonymous);
        let request_id = parts
            .extensions
            .get::<crate::middleware::RequestId>()
            .map(|id| id.0.clone());
        Ok(RequestContext {
            identity,
            request_id,
        })
    }
}
