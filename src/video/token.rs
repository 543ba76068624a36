//! Tokens for authenticating against the video provider.

use anyhow::{Context, Result};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
struct ServerClaims {
    server: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserClaims {
    pub user_id: String,
    pub iat: i64,
    pub exp: i64,
}

/// Server-side token used for REST calls.
pub fn server_token(api_secret: &str) -> Result<String> {
    encode(
        &Header::default(),
        &ServerClaims { server: true },
        &EncodingKey::from_secret(api_secret.as_bytes()),
    )
    .context("Failed to sign server token")
}

/// Token that lets `user_id` join calls, valid for `ttl_seconds`.
pub fn user_token(api_secret: &str, user_id: &str, ttl_seconds: u64) -> Result<String> {
    // Backdate issue time to absorb clock skew with the provider
    let iat = chrono::Utc::now().timestamp() - 5;
    let exp = i64::try_from(ttl_seconds)
        .ok()
        .and_then(|ttl| iat.checked_add(ttl))
        .context("Token lifetime is out of range")?;
    let claims = UserClaims {
        user_id: user_id.to_string(),
        iat,
        exp,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(api_secret.as_bytes()),
    )
    .context("Failed to sign user token")
}
