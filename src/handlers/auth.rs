use axum::extract::State;
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth::{
    hash_password, issue_session, normalize_email, validate_password, verify_password, AuthUser,
};
use crate::models::{NewUser, UserSummary};
use crate::state::AppState;
use crate::store::{Store, StoreError};
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
struct SignupPayload {
    user: UserSummary,
    access: String,
    is_admin: bool,
}

#[derive(Serialize)]
struct LoginPayload {
    access: String,
    is_admin: bool,
}

pub async fn signup<S: Store>(
    State(state): State<AppState<S>>,
    Json(body): Json<SignupRequest>,
) -> Result<Response, AppError> {
    let email = normalize_email(&body.email)?;
    validate_password(&body.password)?;

    let user = state
        .store
        .create_user(NewUser {
            email,
            password_hash: hash_password(&body.password)?,
            is_admin: body.is_admin,
        })
        .await
        .map_err(|err| match err {
            StoreError::Conflict(_) => AppError::ValidationError(
                "A user with this email already exists.".to_string(),
            ),
            other => other.into(),
        })?;

    tracing::info!(user_id = %user.id, is_admin = user.is_admin, "User registered");

    let access = issue_session(&state, &user).await?;
    let payload = SignupPayload {
        user: UserSummary::from(&user),
        access,
        is_admin: user.is_admin,
    };

    Ok(created(payload, "User registered successfully"))
}

pub async fn login<S: Store>(
    State(state): State<AppState<S>>,
    Json(body): Json<LoginRequest>,
) -> Result<Response, AppError> {
    let invalid = || AppError::AuthError("Invalid credentials".to_string());

    let email = normalize_email(&body.email).map_err(|_| invalid())?;
    let user = state.store.find_user_by_email(&email).await?;

    let user = match user {
        Some(user) if verify_password(&body.password, &user.password_hash) => user,
        _ => {
            tracing::warn!(email = %email, "Rejected login");
            return Err(invalid());
        }
    };

    let access = issue_session(&state, &user).await?;

    Ok(success(
        LoginPayload {
            access,
            is_admin: user.is_admin,
        },
        "Login successful",
    ))
}

pub async fn logout<S: Store>(
    State(state): State<AppState<S>>,
    auth: AuthUser,
) -> Result<Response, AppError> {
    state.store.revoke_session(&auth.token_hash).await?;
    tracing::info!(user_id = %auth.user.id, "Session revoked");

    Ok(empty_success("Logged out"))
}
