use crate::auth::models::{Identity, JwtClaims, UserRole};
use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use padbridge_core::AppError;
use std::sync::Arc;

#[derive(Clone)]
pub struct AuthState {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl AuthState {
    pub fn new(jwt_secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Validate and decode a session token
    pub fn verify(&self, token: &str) -> Result<Identity, AppError> {
        let token_data = decode::<JwtClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| AppError::Unauthorized(format!("Invalid session token: {}", e)))?;
        let claims = token_data.claims;
        let role = claims
            .role
            .parse::<UserRole>()
            .map_err(AppError::Unauthorized)?;
        Ok(Identity::User {
            name: claims.sub,
            role,
        })
    }
}

/// Issue an HS256 session token for `user` with `role`.
pub fn issue_session_token(
    jwt_secret: &str,
    user: &str,
    role: UserRole,
    expiry_hours: i64,
) -> Result<String, AppError> {
    let now = chrono::Utc::now();
    let claims = JwtClaims {
        sub: user.to_string(),
        role: role.to_string(),
        exp: (now + chrono::Duration::hours(expiry_hours)).timestamp(),
        iat: now.timestamp(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to sign session token: {}", e)))
}

/// Resolve the caller identity.
///
/// No `Authorization` header means an anonymous caller. A header that is not a
/// valid bearer session token is rejected with 401.
pub async fn identity_middleware(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let identity = match request
        .headers()
        .get("Authorization")
        .map(|h| h.to_str())
    {
        None => Identity::Anonymous,
        Some(Err(_)) => {
            return HttpAppError(AppError::Unauthorized(
                "Invalid authorization header".to_string(),
            ))
            .into_response();
        }
        Some(Ok(header)) => {
            let Some(token) = header.strip_prefix("Bearer ") else {
                return HttpAppError(AppError::Unauthorized(
                    "Invalid authorization header format".to_string(),
                ))
                .into_response();
            };
            match auth_state.verify(token.trim()) {
                Ok(identity) => identity,
                Err(e) => {
                    tracing::debug!(error = %e, "Rejected session token");
                    return HttpAppError(e).into_response();
                }
            }
        }
    };

    if let Some(user) = identity.user_name() {
        tracing::debug!(user = %user, "Authenticated caller");
    }
    request.extensions_mut().insert(identity);
    next.run(request).await
}
