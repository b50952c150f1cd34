use axum::extract::{Path, State};
use axum::response::Response;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::state::AppState;
use crate::store::Store;
use crate::utils::error::AppError;
use crate::utils::response::success;

pub async fn list_volunteers<S: Store>(
    State(state): State<AppState<S>>,
    auth: AuthUser,
) -> Result<Response, AppError> {
    auth.require_admin()?;

    let profiles = state.store.list_profiles().await?;
    Ok(success(profiles, "Volunteers retrieved"))
}

pub async fn get_volunteer<S: Store>(
    State(state): State<AppState<S>>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    auth.require_admin()?;

    let profile = state
        .store
        .get_profile(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Volunteer '{}' was not found", id)))?;

    Ok(success(profile, "Volunteer retrieved"))
}
