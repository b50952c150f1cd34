use axum::extract::State;
use axum::response::Response;
use chrono::Utc;

use crate::auth::AuthUser;
use crate::notifications::notifications_for;
use crate::state::AppState;
use crate::store::Store;
use crate::utils::error::AppError;
use crate::utils::response::success;

pub async fn list_notifications<S: Store>(
    State(state): State<AppState<S>>,
    auth: AuthUser,
) -> Result<Response, AppError> {
    let events = state.store.list_events().await?;
    let window = state.config.reminder_window;

    let notifications = notifications_for(&events, auth.user.id, Utc::now(), window);
    Ok(success(notifications, "Notifications retrieved"))
}
