use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use super::skills::ensure_known_skills;
use crate::auth::AuthUser;
use crate::matching::{best_match, MatchTarget, ScoreBreakdown};
use crate::models::{Event, EventChanges, EventDetail, MatchDraft, NewEvent, VolunteerProfile};
use crate::state::AppState;
use crate::store::Store;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};

/// Suggested volunteer for an event. Both fields are `null` when nobody is
/// available on the event's day.
#[derive(Serialize)]
struct MatchPayload<'a> {
    volunteer: Option<&'a VolunteerProfile>,
    score: Option<ScoreBreakdown>,
}

pub async fn list_events<S: Store>(
    State(state): State<AppState<S>>,
    _auth: AuthUser,
) -> Result<Response, AppError> {
    let events = state.store.list_events().await?;
    Ok(success(events, "Events retrieved"))
}

pub async fn get_event<S: Store>(
    State(state): State<AppState<S>>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let event = load_event(&state, id).await?;
    let detail = detail(&state, event).await?;
    Ok(success(detail, "Event retrieved"))
}

pub async fn create_event<S: Store>(
    State(state): State<AppState<S>>,
    auth: AuthUser,
    Json(body): Json<NewEvent>,
) -> Result<Response, AppError> {
    auth.require_admin()?;

    let body = body.normalize()?;
    ensure_known_skills(state.store.as_ref(), &body.required_skills).await?;
    if let Some(volunteer_id) = body.volunteer_id {
        ensure_volunteer(&state, volunteer_id).await?;
    }

    let event = body.into_event();
    state.store.insert_event(&event).await?;
    tracing::info!(event_id = %event.id, name = %event.name, "Event created");

    let detail = detail(&state, event).await?;
    Ok(created(detail, "Event created"))
}

pub async fn update_event<S: Store>(
    State(state): State<AppState<S>>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(changes): Json<EventChanges>,
) -> Result<Response, AppError> {
    auth.require_admin()?;

    let changes = changes.normalize()?;
    let mut event = load_event(&state, id).await?;

    if let Some(skills) = &changes.required_skills {
        ensure_known_skills(state.store.as_ref(), skills).await?;
    }
    if let Some(Some(volunteer_id)) = changes.volunteer_id {
        ensure_volunteer(&state, volunteer_id).await?;
    }

    let previous = event.status;
    event.apply(changes)?;
    state.store.update_event(&event).await?;

    if previous != event.status {
        tracing::info!(event_id = %id, from = %previous, to = %event.status, "Event status changed");
    }

    let detail = detail(&state, event).await?;
    Ok(success(detail, "Event updated"))
}

pub async fn delete_event<S: Store>(
    State(state): State<AppState<S>>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    auth.require_admin()?;

    if !state.store.delete_event(id).await? {
        return Err(not_found(id));
    }
    tracing::info!(event_id = %id, "Event deleted");

    Ok(empty_success("Event deleted"))
}

pub async fn match_event<S: Store>(
    State(state): State<AppState<S>>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    auth.require_admin()?;

    let event = load_event(&state, id).await?;
    suggest(&state, &event).await
}

/// Match suggestion for an event that has not been saved yet.
pub async fn match_draft<S: Store>(
    State(state): State<AppState<S>>,
    auth: AuthUser,
    Json(draft): Json<MatchDraft>,
) -> Result<Response, AppError> {
    auth.require_admin()?;
    suggest(&state, &draft).await
}

async fn suggest<S, T>(state: &AppState<S>, target: &T) -> Result<Response, AppError>
where
    S: Store,
    T: MatchTarget + Sync,
{
    let pool = state.store.list_profiles().await?;
    let payload = match best_match(target, &pool) {
        Some(found) => MatchPayload {
            volunteer: Some(found.candidate),
            score: Some(found.breakdown),
        },
        None => MatchPayload {
            volunteer: None,
            score: None,
        },
    };

    Ok(success(payload, "Match computed"))
}

async fn load_event<S: Store>(state: &AppState<S>, id: Uuid) -> Result<Event, AppError> {
    state
        .store
        .get_event(id)
        .await?
        .ok_or_else(|| not_found(id))
}

async fn ensure_volunteer<S: Store>(state: &AppState<S>, id: Uuid) -> Result<(), AppError> {
    match state.store.get_profile(id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::NotFound(format!(
            "Volunteer '{}' was not found",
            id
        ))),
    }
}

async fn detail<S: Store>(state: &AppState<S>, event: Event) -> Result<EventDetail, AppError> {
    let volunteer = match event.volunteer_id {
        Some(id) => state.store.get_profile(id).await?,
        None => None,
    };

    Ok(EventDetail { event, volunteer })
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Event '{}' was not found", id))
}
