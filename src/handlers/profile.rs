use axum::extract::State;
use axum::response::Response;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use super::skills::ensure_known_skills;
use crate::auth::AuthUser;
use crate::models::{ProfileInput, VolunteerProfile, ZipCode};
use crate::state::AppState;
use crate::store::Store;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};

#[derive(Debug, Deserialize)]
pub struct NewAvailability {
    pub date: NaiveDate,
}

pub async fn get_profile<S: Store>(
    State(state): State<AppState<S>>,
    auth: AuthUser,
) -> Result<Response, AppError> {
    let profile = own_profile(&state, auth.user.id).await?;
    Ok(success(profile, "Profile retrieved"))
}

pub async fn update_profile<S: Store>(
    State(state): State<AppState<S>>,
    auth: AuthUser,
    Json(input): Json<ProfileInput>,
) -> Result<Response, AppError> {
    let input = input.normalize()?;
    ensure_known_skills(state.store.as_ref(), &input.skills).await?;

    let profile = state.store.save_profile(auth.user.id, input).await?;
    tracing::info!(volunteer_id = %profile.id, "Profile saved");

    Ok(success(profile, "Profile saved"))
}

pub async fn list_availability<S: Store>(
    State(state): State<AppState<S>>,
    auth: AuthUser,
) -> Result<Response, AppError> {
    let profile = own_profile(&state, auth.user.id).await?;
    Ok(success(profile.availability, "Availability retrieved"))
}

pub async fn add_availability<S: Store>(
    State(state): State<AppState<S>>,
    auth: AuthUser,
    Json(body): Json<NewAvailability>,
) -> Result<Response, AppError> {
    let profile = own_profile(&state, auth.user.id).await?;
    if profile.availability.contains(&body.date) {
        return Err(AppError::ValidationError(format!(
            "{} is already listed as available",
            body.date
        )));
    }

    let mut input = editable(profile)?;
    input.availability.push(body.date);

    let profile = state
        .store
        .save_profile(auth.user.id, input.normalize()?)
        .await?;

    Ok(created(profile.availability, "Availability added"))
}

async fn own_profile<S: Store>(
    state: &AppState<S>,
    user_id: Uuid,
) -> Result<VolunteerProfile, AppError> {
    state
        .store
        .get_profile(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile has not been created yet".to_string()))
}

fn editable(profile: VolunteerProfile) -> Result<ProfileInput, AppError> {
    Ok(ProfileInput {
        zip_code: ZipCode::parse(&profile.zip_code)?,
        full_name: profile.full_name,
        address1: profile.address1,
        address2: profile.address2,
        city: profile.city,
        state: profile.state,
        skills: profile.skills,
        preferences: profile.preferences,
        availability: profile.availability,
    })
}
