//! Access token introspection.
//!
//! Tokens are treated as opaque everywhere except here, where the `exp`
//! claim is read for display. Nothing is verified.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::Deserialize;

#[derive(Deserialize)]
struct JwtClaims {
    exp: i64,
}

/// Expiry of a JWT as a Unix timestamp, if the token is a JWT with `exp`.
pub fn expires_at(token: &str) -> Option<i64> {
    let payload = token.split('.').nth(1)?;
    let decoded = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: JwtClaims = serde_json::from_slice(&decoded).ok()?;
    Some(claims.exp)
}

/// Seconds until the token expires, clamped at zero.
pub fn expires_in(token: &str) -> Option<i64> {
    let exp = expires_at(token)?;
    Some((exp - chrono::Utc::now().timestamp()).max(0))
}
