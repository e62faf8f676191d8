use crate::state::AppState;
use axum::{http::StatusCode, Router};
use thiserror::Error;

mod claims;
pub mod dto;
pub(crate) mod extractors;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod repo;
pub mod repo_types;
pub mod services;

pub use extractors::AuthUser;

/// Failures of the session issuer and the request authenticator.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("No token provided")]
    MissingToken,
    #[error("Invalid token format")]
    MalformedToken,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error("Invalid token: missing user id")]
    MissingClaim,
    #[error("Invalid user id for token")]
    InvalidUser,
    #[error("Token signing failed: {0}")]
    Signing(jsonwebtoken::errors::Error),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::InvalidUser | AuthError::Signing(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}
