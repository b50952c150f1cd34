use axum::extract::State;
use axum::response::Response;

use crate::auth::AuthUser;
use crate::reports::{self, participation, to_csv, to_pdf, EventReport, HistoryReport};
use crate::state::AppState;
use crate::store::Store;
use crate::utils::error::AppError;
use crate::utils::response::{file_response, success};

const EVENTS_CSV: &str = "ExportEvent.csv";
const EVENTS_PDF: &str = "ExportEvent.pdf";
const HISTORY_CSV: &str = "ExportVolunteer.csv";
const HISTORY_PDF: &str = "ExportVolunteer.pdf";

pub async fn events_csv<S: Store>(
    State(state): State<AppState<S>>,
    auth: AuthUser,
) -> Result<Response, AppError> {
    auth.require_admin()?;

    let report = event_report(&state).await?;
    Ok(file_response(to_csv(&report)?, reports::csv::CONTENT_TYPE, EVENTS_CSV))
}

pub async fn events_pdf<S: Store>(
    State(state): State<AppState<S>>,
    auth: AuthUser,
) -> Result<Response, AppError> {
    auth.require_admin()?;

    let report = event_report(&state).await?;
    Ok(file_response(to_pdf(&report)?, reports::pdf::CONTENT_TYPE, EVENTS_PDF))
}

pub async fn history_csv<S: Store>(
    State(state): State<AppState<S>>,
    auth: AuthUser,
) -> Result<Response, AppError> {
    auth.require_admin()?;

    let report = history_report(&state).await?;
    Ok(file_response(to_csv(&report)?, reports::csv::CONTENT_TYPE, HISTORY_CSV))
}

pub async fn history_pdf<S: Store>(
    State(state): State<AppState<S>>,
    auth: AuthUser,
) -> Result<Response, AppError> {
    auth.require_admin()?;

    let report = history_report(&state).await?;
    Ok(file_response(to_pdf(&report)?, reports::pdf::CONTENT_TYPE, HISTORY_PDF))
}

pub async fn participation_summary<S: Store>(
    State(state): State<AppState<S>>,
    auth: AuthUser,
) -> Result<Response, AppError> {
    auth.require_admin()?;

    let history = state.store.list_history(None).await?;
    let profiles = state.store.list_profiles().await?;

    Ok(success(
        participation(&history, &profiles),
        "Participation retrieved",
    ))
}

async fn event_report<S: Store>(state: &AppState<S>) -> Result<EventReport, AppError> {
    let events = state.store.list_events().await?;
    let profiles = state.store.list_profiles().await?;
    Ok(EventReport::build(&events, &profiles))
}

async fn history_report<S: Store>(state: &AppState<S>) -> Result<HistoryReport, AppError> {
    let history = state.store.list_history(None).await?;
    let events = state.store.list_events().await?;
    let profiles = state.store.list_profiles().await?;
    Ok(HistoryReport::build(&history, &events, &profiles))
}
