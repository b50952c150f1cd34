use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::models::{BulkHistory, Event, HistoryEntry, NewHistory, VolunteerHistory};
use crate::state::AppState;
use crate::store::Store;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};

pub async fn my_history<S: Store>(
    State(state): State<AppState<S>>,
    auth: AuthUser,
) -> Result<Response, AppError> {
    let entries = entries_for(&state, auth.user.id).await?;
    Ok(success(entries, "History retrieved"))
}

pub async fn volunteer_history<S: Store>(
    State(state): State<AppState<S>>,
    auth: AuthUser,
    Path(volunteer_id): Path<Uuid>,
) -> Result<Response, AppError> {
    if auth.user.id != volunteer_id {
        auth.require_admin()?;
    }

    let entries = entries_for(&state, volunteer_id).await?;
    Ok(success(entries, "History retrieved"))
}

pub async fn create_history<S: Store>(
    State(state): State<AppState<S>>,
    auth: AuthUser,
    Json(body): Json<NewHistory>,
) -> Result<Response, AppError> {
    auth.require_admin()?;

    let mut entries = record(&state, vec![body]).await?;
    Ok(created(entries.pop(), "History recorded"))
}

pub async fn bulk_create_history<S: Store>(
    State(state): State<AppState<S>>,
    auth: AuthUser,
    Json(body): Json<BulkHistory>,
) -> Result<Response, AppError> {
    auth.require_admin()?;

    if body.records.is_empty() {
        return Err(AppError::ValidationError(
            "At least one record is required".to_string(),
        ));
    }

    let entries = record(&state, body.records).await?;
    Ok(created(entries, "History recorded"))
}

/// Validates every request first so a bad record leaves nothing written.
async fn record<S: Store>(
    state: &AppState<S>,
    requests: Vec<NewHistory>,
) -> Result<Vec<HistoryEntry>, AppError> {
    let mut pairs = Vec::with_capacity(requests.len());

    for request in requests {
        if state.store.get_profile(request.volunteer_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "Volunteer '{}' was not found",
                request.volunteer_id
            )));
        }
        let event = state
            .store
            .get_event(request.event_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Event '{}' was not found", request.event_id))
            })?;

        pairs.push((VolunteerHistory::record(request.volunteer_id, &event), event));
    }

    let records: Vec<VolunteerHistory> = pairs.iter().map(|(r, _)| r.clone()).collect();
    state.store.insert_history(&records).await?;
    tracing::info!(count = records.len(), "History recorded");

    Ok(pairs
        .into_iter()
        .map(|(record, event)| HistoryEntry::new(record, event))
        .collect())
}

async fn entries_for<S: Store>(
    state: &AppState<S>,
    volunteer_id: Uuid,
) -> Result<Vec<HistoryEntry>, AppError> {
    let records = state.store.list_history(Some(volunteer_id)).await?;
    let events: HashMap<Uuid, Event> = state
        .store
        .list_events()
        .await?
        .into_iter()
        .map(|e| (e.id, e))
        .collect();

    Ok(records
        .into_iter()
        .filter_map(|record| {
            let event = events.get(&record.event_id)?.clone();
            Some(HistoryEntry::new(record, event))
        })
        .collect())
}
