use axum::response::Response;
use serde::Serialize;

use crate::utils::response::success;

pub mod auth;
pub mod events;
pub mod history;
pub mod notifications;
pub mod profile;
pub mod reports;
pub mod skills;
pub mod volunteers;

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "volunteer-api",
    };

    success(payload, "Health check successful")
}
