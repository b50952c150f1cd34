use axum::extract::State;
use axum::response::Response;
use axum::Json;
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::state::AppState;
use crate::store::Store;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};

const MAX_SKILL_LEN: usize = 50;

#[derive(Debug, Deserialize)]
pub struct NewSkill {
    pub name: String,
}

pub async fn list_skills<S: Store>(State(state): State<AppState<S>>) -> Result<Response, AppError> {
    let skills = state.store.list_skills().await?;
    Ok(success(skills, "Skills retrieved"))
}

pub async fn add_skill<S: Store>(
    State(state): State<AppState<S>>,
    auth: AuthUser,
    Json(body): Json<NewSkill>,
) -> Result<Response, AppError> {
    auth.require_admin()?;

    let name = body.name.trim();
    if name.is_empty() || name.chars().count() > MAX_SKILL_LEN {
        return Err(AppError::ValidationError(format!(
            "Skill name must be 1 to {} characters",
            MAX_SKILL_LEN
        )));
    }

    state.store.add_skill(name).await?;
    tracing::info!(skill = name, "Skill added");

    Ok(created(name, "Skill added"))
}

/// Rejects labels missing from the skill catalog.
pub(crate) async fn ensure_known_skills<S: Store>(
    store: &S,
    labels: &[String],
) -> Result<(), AppError> {
    if labels.is_empty() {
        return Ok(());
    }

    let catalog = store.list_skills().await?;
    let unknown: Vec<&str> = labels
        .iter()
        .filter(|label| !catalog.contains(label))
        .map(String::as_str)
        .collect();

    if unknown.is_empty() {
        Ok(())
    } else {
        Err(AppError::ValidationError(format!(
            "Unknown skills: {}",
            unknown.join(", ")
        )))
    }
}
