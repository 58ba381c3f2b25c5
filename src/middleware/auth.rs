//! Authentication middleware
//!
//! Validates an optional bearer token against the configured secret.
//! Authentication is opt-in: with no secret configured every request passes.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::{error::AppError, AppState};

/// Why a request was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Missing bearer token")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,
}

/// Return the bearer token if the header uses the `Bearer ` scheme
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

/// Short fingerprint of a token, safe to log
pub fn token_fingerprint(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(&hasher.finalize()[..4])
}

/// Checks presented bearer tokens against the configured secret
#[derive(Clone)]
pub struct Authenticator {
    secret: String,
}

impl Authenticator {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into().trim().to_string(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.secret.is_empty()
    }

    pub fn authorize(&self, authorization: Option<&str>) -> Result<(), AuthError> {
        if !self.is_enabled() {
            return Ok(());
        }

        let token = authorization
            .and_then(extract_bearer_token)
            .ok_or(AuthError::MissingToken)?
            .trim();

        if token.len() == self.secret.len()
            && bool::from(token.as_bytes().ct_eq(self.secret.as_bytes()))
        {
            Ok(())
        } else {
            debug!(fingerprint = %token_fingerprint(token), "Presented token does not match");
            Err(AuthError::InvalidToken)
        }
    }
}

/// Authentication middleware for the forwarded routes
#[instrument(skip_all, fields(path = %request.uri().path()))]
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // A header that is not valid UTF-8 cannot carry the scheme prefix
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    if let Err(e) = state.authenticator.authorize(auth_header) {
        warn!(reason = %e, "Request rejected");
        return Err(e.into());
    }

    Ok(next.run(request).await)
}
