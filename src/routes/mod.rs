use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, create_security_headers_layer};
use crate::handlers::{
    auth, events, health_check, history, notifications, profile, reports, skills, volunteers,
};
use crate::state::AppState;
use crate::store::Store;

pub fn create_routes<S: Store>(state: AppState<S>) -> Router {
    let security = create_security_headers_layer(&state.config);
    let cors = create_cors_layer(&state.config);

    Router::new()
        .route("/health", get(health_check))
        // Accounts
        .route("/signup", post(auth::signup::<S>))
        .route("/login", post(auth::login::<S>))
        .route("/logout", post(auth::logout::<S>))
        // Volunteer self-service
        .route(
            "/profile",
            get(profile::get_profile::<S>).put(profile::update_profile::<S>),
        )
        .route(
            "/availabilities",
            get(profile::list_availability::<S>).post(profile::add_availability::<S>),
        )
        .route(
            "/skills",
            get(skills::list_skills::<S>).post(skills::add_skill::<S>),
        )
        .route("/notifications", get(notifications::list_notifications::<S>))
        // Administration
        .route("/users", get(volunteers::list_volunteers::<S>))
        .route("/users/:id", get(volunteers::get_volunteer::<S>))
        .route(
            "/events",
            get(events::list_events::<S>).post(events::create_event::<S>),
        )
        .route(
            "/events/:id",
            get(events::get_event::<S>)
                .put(events::update_event::<S>)
                .delete(events::delete_event::<S>),
        )
        .route("/events/:id/match", get(events::match_event::<S>))
        .route("/match", post(events::match_draft::<S>))
        .route(
            "/volunteer-history",
            get(history::my_history::<S>).post(history::create_history::<S>),
        )
        .route(
            "/volunteer-history/bulk-create",
            post(history::bulk_create_history::<S>),
        )
        .route("/history/:volunteer_id", get(history::volunteer_history::<S>))
        // Reports
        .route("/report/events/csv", get(reports::events_csv::<S>))
        .route("/report/events/pdf", get(reports::events_pdf::<S>))
        .route("/report/volunteer-history/csv", get(reports::history_csv::<S>))
        .route("/report/volunteer-history/pdf", get(reports::history_pdf::<S>))
        .route(
            "/report/participation",
            get(reports::participation_summary::<S>),
        )
        .layer(TraceLayer::new_for_http())
        .layer(security)
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::store::MemoryStore;
    use axum::body::{to_bytes, Body};
    use axum::http::header::{AUTHORIZATION, CONTENT_DISPOSITION, CONTENT_TYPE};
    use axum::http::{HeaderMap, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        create_routes(AppState::new(MemoryStore::new(), Config::default()))
    }

    async fn call(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, HeaderMap, Vec<u8>) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => request
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, bytes.to_vec())
    }

    async fn json(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let (status, _, bytes) = call(app, method, uri, token, body).await;
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    async fn signup(app: &Router, email: &str, is_admin: bool) -> (String, String) {
        let (status, body) = json(
            app,
            Method::POST,
            "/signup",
            None,
            Some(json!({ "email": email, "password": "hunter22!", "is_admin": is_admin })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");

        let data = &body["data"];
        (
            data["access"].as_str().unwrap().to_string(),
            data["user"]["id"].as_str().unwrap().to_string(),
        )
    }

    async fn save_profile(app: &Router, token: &str, name: &str, zip: &str, skills: &[&str]) {
        let (status, body) = json(
            app,
            Method::PUT,
            "/profile",
            Some(token),
            Some(json!({
                "full_name": name,
                "address1": "100 Main St",
                "city": "Houston",
                "state": "TX",
                "zip_code": zip,
                "skills": skills,
                "availability": ["2024-05-01"],
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
    }

    async fn create_event(app: &Router, admin: &str, extra: Value) -> Value {
        let mut body = json!({
            "name": "Food Bank Shift",
            "description": "Sort donations",
            "zip_code": "77004",
            "required_skills": ["Cooking", "Driving"],
            "urgency": "High",
            "date": "2024-05-01T10:00:00Z",
        });
        if let (Some(target), Some(extra)) = (body.as_object_mut(), extra.as_object()) {
            target.extend(extra.clone());
        }

        let (status, body) = json(app, Method::POST, "/events", Some(admin), Some(body)).await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"].clone()
    }

    #[tokio::test]
    async fn test_health_check() {
        let (status, body) = json(&app(), Method::GET, "/health", None, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "ok");
        assert_eq!(body["data"]["service"], "volunteer-api");
    }

    #[tokio::test]
    async fn test_signup_login_logout() {
        let app = app();
        let (token, _) = signup(&app, "Ann@Example.com", false).await;

        let (status, body) = json(
            &app,
            Method::POST,
            "/login",
            None,
            Some(json!({ "email": "ann@example.com", "password": "wrong-password" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["message"], "Invalid credentials");

        let (status, body) = json(
            &app,
            Method::POST,
            "/login",
            None,
            Some(json!({ "email": "ANN@example.com", "password": "hunter22!" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["is_admin"], false);

        let (status, _) = json(&app, Method::POST, "/logout", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = json(&app, Method::GET, "/events", Some(&token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_duplicate_signup_is_rejected() {
        let app = app();
        signup(&app, "ann@example.com", false).await;

        let (status, body) = json(
            &app,
            Method::POST,
            "/signup",
            None,
            Some(json!({ "email": "ANN@example.com", "password": "another-pass" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"]["message"],
            "A user with this email already exists."
        );
    }

    #[tokio::test]
    async fn test_requests_without_token_are_unauthorized() {
        let (status, _) = json(&app(), Method::GET, "/profile", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_volunteers_cannot_manage_events() {
        let app = app();
        let (token, _) = signup(&app, "vol@example.com", false).await;

        let (status, _) = json(
            &app,
            Method::POST,
            "/events",
            Some(&token),
            Some(json!({
                "name": "Cleanup",
                "zip_code": "77004",
                "urgency": "Low",
                "date": "2024-05-01T10:00:00Z",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = json(&app, Method::GET, "/report/events/csv", Some(&token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_profile_rejects_unknown_skills() {
        let app = app();
        let (token, _) = signup(&app, "vol@example.com", false).await;

        let (status, body) = json(
            &app,
            Method::PUT,
            "/profile",
            Some(&token),
            Some(json!({
                "full_name": "Ann",
                "address1": "1 Main St",
                "city": "Houston",
                "state": "TX",
                "zip_code": "77004",
                "skills": ["Juggling"],
            })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Unknown skills: Juggling");
    }

    #[tokio::test]
    async fn test_availability_is_added_once() {
        let app = app();
        let (token, _) = signup(&app, "vol@example.com", false).await;
        save_profile(&app, &token, "Ann", "77004", &["Cooking"]).await;

        let add = || json!({ "date": "2024-04-20" });
        let (status, body) =
            json(&app, Method::POST, "/availabilities", Some(&token), Some(add())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"], json!(["2024-04-20", "2024-05-01"]));

        let (status, _) =
            json(&app, Method::POST, "/availabilities", Some(&token), Some(add())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_match_picks_best_volunteer() {
        let app = app();
        let (admin, _) = signup(&app, "admin@example.com", true).await;
        let (ann, _) = signup(&app, "ann@example.com", false).await;
        let (bea, _) = signup(&app, "bea@example.com", false).await;

        // Ann: half the skills, exact zip (5 + 5). Bea: all skills, same prefix (10 + 3).
        save_profile(&app, &ann, "Ann", "77004", &["Cooking"]).await;
        save_profile(&app, &bea, "Bea", "77005", &["Cooking", "Driving"]).await;

        let event = create_event(&app, &admin, json!({})).await;
        let uri = format!("/events/{}/match", event["id"].as_str().unwrap());

        let (status, body) = json(&app, Method::GET, &uri, Some(&admin), None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["volunteer"]["full_name"], "Bea");
        assert_eq!(body["data"]["score"]["skill"], 10.0);
        assert_eq!(body["data"]["score"]["location"], 3.0);
    }

    #[tokio::test]
    async fn test_draft_match_with_nobody_available() {
        let app = app();
        let (admin, _) = signup(&app, "admin@example.com", true).await;
        let (ann, _) = signup(&app, "ann@example.com", false).await;
        save_profile(&app, &ann, "Ann", "77004", &["Cooking"]).await;

        let (status, body) = json(
            &app,
            Method::POST,
            "/match",
            Some(&admin),
            Some(json!({
                "required_skills": ["Cooking"],
                "date": "2024-06-01T10:00:00Z",
                "zip_code": "77004",
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["data"]["volunteer"].is_null());
        assert!(body["data"]["score"].is_null());
    }

    #[tokio::test]
    async fn test_terminal_status_cannot_change() {
        let app = app();
        let (admin, _) = signup(&app, "admin@example.com", true).await;
        let event = create_event(&app, &admin, json!({})).await;
        assert_eq!(event["status"], "Pending");
        let uri = format!("/events/{}", event["id"].as_str().unwrap());

        let (status, body) = json(
            &app,
            Method::PUT,
            &uri,
            Some(&admin),
            Some(json!({ "status": "No Show" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "No Show");

        let (status, _) = json(
            &app,
            Method::PUT,
            &uri,
            Some(&admin),
            Some(json!({ "status": "Pending", "name": "Renamed" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, body) = json(&app, Method::GET, &uri, Some(&admin), None).await;
        assert_eq!(body["data"]["status"], "No Show");
        assert_eq!(body["data"]["name"], "Food Bank Shift");
    }

    #[tokio::test]
    async fn test_null_volunteer_unassigns() {
        let app = app();
        let (admin, _) = signup(&app, "admin@example.com", true).await;
        let (ann, ann_id) = signup(&app, "ann@example.com", false).await;
        save_profile(&app, &ann, "Ann", "77004", &["Cooking"]).await;

        let event = create_event(&app, &admin, json!({ "volunteer_id": ann_id })).await;
        assert_eq!(event["volunteer"]["full_name"], "Ann");
        let uri = format!("/events/{}", event["id"].as_str().unwrap());

        let (_, body) = json(
            &app,
            Method::PUT,
            &uri,
            Some(&admin),
            Some(json!({ "urgency": "Low" })),
        )
        .await;
        assert_eq!(body["data"]["volunteer_id"], ann_id.as_str());

        let (status, body) = json(
            &app,
            Method::PUT,
            &uri,
            Some(&admin),
            Some(json!({ "volunteer_id": null })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"]["volunteer_id"].is_null());
        assert!(body["data"]["volunteer"].is_null());
    }

    #[tokio::test]
    async fn test_assigning_unknown_volunteer_fails() {
        let app = app();
        let (admin, _) = signup(&app, "admin@example.com", true).await;

        let (status, _) = json(
            &app,
            Method::POST,
            "/events",
            Some(&admin),
            Some(json!({
                "name": "Cleanup",
                "zip_code": "77004",
                "urgency": "Low",
                "date": "2024-05-01T10:00:00Z",
                "volunteer_id": "00000000-0000-0000-0000-000000000001",
            })),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_history_and_notifications_follow_assignments() {
        let app = app();
        let (admin, _) = signup(&app, "admin@example.com", true).await;
        let (ann, ann_id) = signup(&app, "ann@example.com", false).await;
        let (bea, bea_id) = signup(&app, "bea@example.com", false).await;
        save_profile(&app, &ann, "Ann", "77004", &["Cooking"]).await;

        let event = create_event(&app, &admin, json!({ "volunteer_id": ann_id })).await;
        let event_id = event["id"].as_str().unwrap();

        let (status, body) = json(&app, Method::GET, "/notifications", Some(&ann), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][0]["title"], "New Event");
        assert_eq!(body["data"][0]["urgent"], true);

        let (status, _) = json(
            &app,
            Method::POST,
            "/volunteer-history",
            Some(&admin),
            Some(json!({ "volunteer_id": ann_id, "event_id": event_id })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (_, body) = json(&app, Method::GET, "/volunteer-history", Some(&ann), None).await;
        assert_eq!(body["data"][0]["event"]["name"], "Food Bank Shift");
        assert_eq!(body["data"][0]["status"], "Pending");

        let other = format!("/history/{ann_id}");
        let (status, _) = json(&app, Method::GET, &other, Some(&bea), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        // Bea has no profile yet, so the whole batch is refused.
        let (status, _) = json(
            &app,
            Method::POST,
            "/volunteer-history/bulk-create",
            Some(&admin),
            Some(json!({ "records": [
                { "volunteer_id": ann_id, "event_id": event_id },
                { "volunteer_id": bea_id, "event_id": event_id },
            ]})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, body) = json(&app, Method::GET, "/report/participation", Some(&admin), None).await;
        assert_eq!(body["data"], json!([{ "volunteer_id": ann_id, "name": "Ann", "events": 1 }]));
    }

    #[tokio::test]
    async fn test_deleting_event_drops_history() {
        let app = app();
        let (admin, _) = signup(&app, "admin@example.com", true).await;
        let (ann, ann_id) = signup(&app, "ann@example.com", false).await;
        save_profile(&app, &ann, "Ann", "77004", &["Cooking"]).await;
        let event = create_event(&app, &admin, json!({})).await;
        let event_id = event["id"].as_str().unwrap();

        json(
            &app,
            Method::POST,
            "/volunteer-history",
            Some(&admin),
            Some(json!({ "volunteer_id": ann_id, "event_id": event_id })),
        )
        .await;

        let uri = format!("/events/{event_id}");
        let (status, _) = json(&app, Method::DELETE, &uri, Some(&admin), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = json(&app, Method::DELETE, &uri, Some(&admin), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, body) = json(&app, Method::GET, "/volunteer-history", Some(&ann), None).await;
        assert_eq!(body["data"], json!([]));
    }

    #[tokio::test]
    async fn test_reports_download_as_attachments() {
        let app = app();
        let (admin, _) = signup(&app, "admin@example.com", true).await;
        create_event(&app, &admin, json!({})).await;

        let (status, headers, bytes) =
            call(&app, Method::GET, "/report/events/csv", Some(&admin), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            headers[CONTENT_DISPOSITION],
            "attachment; filename=\"ExportEvent.csv\""
        );
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("Event Name,"));
        assert!(text.contains("Food Bank Shift"));

        let (status, headers, bytes) = call(
            &app,
            Method::GET,
            "/report/volunteer-history/pdf",
            Some(&admin),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[CONTENT_TYPE], "application/pdf");
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_only_admins_add_skills() {
        let app = app();
        let (admin, _) = signup(&app, "admin@example.com", true).await;

        let (status, _) = json(
            &app,
            Method::POST,
            "/skills",
            Some(&admin),
            Some(json!({ "name": "Tutoring" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, _) = json(
            &app,
            Method::POST,
            "/skills",
            Some(&admin),
            Some(json!({ "name": "Tutoring" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (_, body) = json(&app, Method::GET, "/skills", None, None).await;
        assert!(body["data"].as_array().unwrap().contains(&json!("Tutoring")));
    }
}
