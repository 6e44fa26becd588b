//! Shared-secret authentication for the admin routes.
//! The caller sends the secret in the `X-Api-Key` header and it has to match the configured key exactly.

use axum::http::{HeaderMap, StatusCode};
use secrecy::{ExposeSecret, SecretString};

use super::{ClientError, API_KEY_HEADER};

pub type Result<T> = core::result::Result<T, AuthError>;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("header 'x-api-key' is missing from the request")]
    MissingApiKey,
    #[error("got a non-visible-ascii value in 'x-api-key' header")]
    InvalidHeaderValue,
    #[error("the provided api key doesn't match the configured one")]
    ApiKeyMismatch,
}

impl AuthError {
    pub fn status_code_and_client_error(&self) -> (StatusCode, ClientError) {
        (StatusCode::UNAUTHORIZED, ClientError::Unauthorized)
    }
}

/// Checks the `X-Api-Key` header against `expected`.
pub fn authorize(headers: &HeaderMap, expected: &SecretString) -> Result<()> {
    let provided = headers
        .get(API_KEY_HEADER)
        .ok_or(AuthError::MissingApiKey)?
        .to_str()
        .map_err(|_| AuthError::InvalidHeaderValue)?;

    if provided != expected.expose_secret() {
        return Err(AuthError::ApiKeyMismatch);
    }

    Ok(())
}
