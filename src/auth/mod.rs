//! Accounts and bearer-token sessions.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::Utc;

use crate::models::{NewSession, User};
use crate::state::AppState;
use crate::store::Store;
use crate::utils::error::AppError;

pub mod password;
pub mod token;

pub use password::{hash_password, normalize_email, validate_password, verify_password};
pub use token::{generate_token_default, hash_token};

/// The caller, resolved from `Authorization: Bearer <token>`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
    pub token_hash: Vec<u8>,
}

impl AuthUser {
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.user.is_admin {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Administrator access required".to_string(),
            ))
        }
    }
}

#[async_trait]
impl<S: Store> FromRequestParts<AppState<S>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AppError::AuthError("Missing bearer token".to_string()))?;

        let token_hash = hash_token(token);
        let user = state
            .store
            .find_session_user(&token_hash, Utc::now())
            .await?
            .ok_or_else(|| AppError::AuthError("Invalid or expired token".to_string()))?;

        Ok(Self { user, token_hash })
    }
}

/// Opens a session for `user` and returns the raw token to hand to the client.
pub async fn issue_session<S: Store>(state: &AppState<S>, user: &User) -> Result<String, AppError> {
    let token = generate_token_default();

    state
        .store
        .create_session(NewSession {
            user_id: user.id,
            token_hash: hash_token(&token),
            expires_at: Utc::now() + state.config.session_ttl,
        })
        .await?;

    tracing::info!(user_id = %user.id, "Session issued");
    Ok(token)
}
