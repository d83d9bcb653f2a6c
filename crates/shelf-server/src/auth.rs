//! Bearer-key authentication.
//!
//! Two key sources: the static `SHELF_API_KEY` from the environment,
//! compared directly, and hashed keys in the `api_keys` table, looked up
//! by SHA-256 digest so the database never holds a usable key.

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use sha2::{Digest, Sha256};

use crate::error::AppError;
use crate::routes::AppState;

pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| {
            tracing::debug!("Rejected request without an Authorization header");
            AppError::Unauthorized
        })?;

    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            tracing::debug!("Rejected Authorization header without a bearer key");
            AppError::Unauthorized
        })
}

pub async fn verify_api_key(state: &AppState, token: &str) -> Result<(), AppError> {
    if let Some(static_key) = &state.config.api_key {
        if token == static_key {
            return Ok(());
        }
    }

    if state.store.touch_api_key(&hash_key(token)).await? {
        return Ok(());
    }

    tracing::debug!("Rejected unknown API key");
    Err(AppError::Unauthorized)
}

pub fn hash_key(token: &str) -> String {
    use std::fmt::Write;

    let digest = Sha256::digest(token.as_bytes());
    digest.iter().fold(
        String::with_capacity(digest.len() * 2),
        |mut out, byte| {
            let _ = write!(out, "{byte:02x}");
            out
        },
    )
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn extract_bearer_token_requires_prefix() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer sk-test"));
        assert_eq!(extract_bearer_token(&headers).unwrap(), "sk-test");

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(extract_bearer_token(&headers).is_err());

        headers.remove(AUTHORIZATION);
        assert!(extract_bearer_token(&headers).is_err());
    }

    #[test]
    fn hash_key_is_stable_hex() {
        let hash = hash_key("sk-test");
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, hash_key("sk-test"));
        assert_ne!(hash, hash_key("sk-other"));
    }
}
