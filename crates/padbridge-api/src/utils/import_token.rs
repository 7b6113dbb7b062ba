//! Signed token for editor document import (no session).
//!
//! Payload: expiry_ts (u64 BE) || file_id (i64 BE) = 16 bytes.
//! Token = base64url(payload || HMAC-SHA256(secret, payload)).
//!
//! A token only grants reading one file until it expires; no write route accepts it.

use base64::Engine;
use hmac::{Hmac, Mac};
use padbridge_core::constants::IMPORT_ENDPOINT;
use padbridge_core::AppError;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use sha2::Sha256;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

const PAYLOAD_LEN: usize = 8 + 8; // expiry + file_id
const MAC_LEN: usize = 32; // SHA256
const TOKEN_LEN: usize = PAYLOAD_LEN + MAC_LEN;

// RFC 3986 unreserved characters stay as they are
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

fn mac_for(secret: &[u8]) -> Result<Hmac<Sha256>, AppError> {
    Hmac::<Sha256>::new_from_slice(secret)
        .map_err(|e| AppError::Internal(format!("Invalid token key: {}", e)))
}

/// Build a signed import token for `file_id`, valid for `expires_in`.
pub fn create(file_id: i64, expires_in: Duration, secret: &[u8]) -> Result<String, AppError> {
    create_at(file_id, now_secs().saturating_add(expires_in.as_secs()), secret)
}

fn create_at(file_id: i64, expiry_ts: u64, secret: &[u8]) -> Result<String, AppError> {
    let mut payload = [0u8; PAYLOAD_LEN];
    payload[0..8].copy_from_slice(&expiry_ts.to_be_bytes());
    payload[8..16].copy_from_slice(&file_id.to_be_bytes());

    let mut mac = mac_for(secret)?;
    mac.update(&payload);
    let tag = mac.finalize().into_bytes();

    let mut token_bytes = [0u8; TOKEN_LEN];
    token_bytes[0..PAYLOAD_LEN].copy_from_slice(&payload);
    token_bytes[PAYLOAD_LEN..].copy_from_slice(&tag);

    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(token_bytes))
}

/// What a verified token grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportGrant {
    pub file_id: i64,
    /// Unix seconds after which the token is refused
    pub expires_at: u64,
}

/// Verify a token's signature and expiry and return its grant.
pub fn decode(token: &str, secret: &[u8]) -> Result<ImportGrant, AppError> {
    let invalid = || AppError::InvalidInput("Invalid import token".to_string());

    let decoded = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(token)
        .map_err(|_| invalid())?;
    if decoded.len() != TOKEN_LEN {
        return Err(invalid());
    }
    let (payload, tag) = decoded.split_at(PAYLOAD_LEN);
    let mut mac = mac_for(secret)?;
    mac.update(payload);
    mac.verify_slice(tag).map_err(|_| invalid())?;

    let (expiry, file_id) = payload.split_at(8);
    let expires_at = u64::from_be_bytes(expiry.try_into().map_err(|_| invalid())?);
    if now_secs() > expires_at {
        return Err(AppError::InvalidInput(
            "Import token has expired".to_string(),
        ));
    }

    Ok(ImportGrant {
        file_id: i64::from_be_bytes(file_id.try_into().map_err(|_| invalid())?),
        expires_at,
    })
}

/// `{public_base_url}tiki-cryptpad-import.php?data={token}`
pub fn import_url(public_base_url: &str, token: &str) -> String {
    format!(
        "{}{}?data={}",
        public_base_url,
        IMPORT_ENDPOINT,
        utf8_percent_encode(token, QUERY_VALUE)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-jwt-secret-at-least-32-characters-long";

    #[test]
    fn test_token_is_scoped_to_file() {
        let token = create(42, Duration::from_secs(7200), SECRET).unwrap();
        assert_eq!(decode(&token, SECRET).unwrap().file_id, 42);
    }

    #[test]
    fn test_token_expires_after_ttl() {
        let before = now_secs();
        let token = create(42, Duration::from_secs(7200), SECRET).unwrap();
        let grant = decode(&token, SECRET).unwrap();
        assert_eq!(grant.file_id, 42);
        assert!(grant.expires_at >= before + 7200);
        assert!(grant.expires_at <= now_secs() + 7200);
    }

    #[test]
    fn test_tampered_token_rejected() {
        let token = create(42, Duration::from_secs(7200), SECRET).unwrap();
        let mut bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(&token)
            .unwrap();
        // Point the token at another file without re-signing
        bytes[15] ^= 0x01;
        let forged = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes);
        assert!(decode(&forged, SECRET).is_err());
        assert!(decode(&token, b"some-other-secret-value-32-bytes!!").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = create_at(42, now_secs() - 1, SECRET).unwrap();
        let err = decode(&token, SECRET).unwrap_err();
        assert!(err.to_string().contains("expired"));
    }

    #[test]
    fn test_malformed_token_rejected() {
        assert!(decode("", SECRET).is_err());
        assert!(decode("not base64!", SECRET).is_err());
        assert!(decode("AAAA", SECRET).is_err());
    }

    #[test]
    fn test_import_url() {
        let url = import_url("https://cms.example.org/", "abc-_def");
        assert_eq!(
            url,
            "https://cms.example.org/tiki-cryptpad-import.php?data=abc-_def"
        );
    }
}
