mod assistant;
mod auth;
mod pricing;
mod projects;
mod reservations;
mod stats;

use std::sync::Arc;

use axum::routing::{get, patch, post};
use axum::Router;

use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/logout", post(auth::logout))
        .route("/api/v1/auth/session", get(auth::session))
        .route(
            "/api/v1/projects",
            get(projects::list).post(projects::create),
        )
        .route("/api/v1/projects/{id}", patch(projects::update))
        .route("/api/v1/reservations", get(reservations::list))
        .route("/api/v1/stats", get(stats::dashboard))
        .route("/api/v1/analytics", get(stats::analytics))
        .route("/api/v1/pricing/features", get(pricing::features))
        .route("/api/v1/pricing/quote", post(pricing::quote))
        .route("/api/v1/assistant/briefing", post(assistant::briefing))
        .route("/api/v1/assistant/chat", post(assistant::chat))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use nexgen_core::config::NexgenConfig;
    use nexgen_core::session::SessionWatch;
    use nexgen_core::storage::{MemStorage, Storage};
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    fn test_app() -> Router {
        let state = Arc::new(AppState {
            storage: Storage::Mem(MemStorage::new()),
            llm: None,
            sessions: SessionWatch::new(),
            config: NexgenConfig::default_config(),
        });
        router().with_state(state)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn patch_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("PATCH")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn empty_board_reports_empty_status() {
        let app = test_app();
        let response = app.oneshot(get_req("/api/v1/projects")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["connectionStatus"], "empty");
        assert_eq!(json["projects"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn create_then_list_round_trip() {
        let app = test_app();

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/v1/projects",
                json!({
                    "clientName": "Acme Corp",
                    "serviceType": "Web Development",
                    "value": 3200
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        assert_eq!(created["clientName"], "Acme Corp");
        assert_eq!(created["value"], 3200);
        assert_eq!(created["status"], "Lead");

        let response = app.oneshot(get_req("/api/v1/projects")).await.unwrap();
        let json = body_json(response).await;
        assert_eq!(json["connectionStatus"], "connected");
        assert_eq!(json["projects"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn create_with_quote_prices_the_order() {
        let app = test_app();

        // web base 1500 + responsive 500 + seo 800 - 300 = 2500, rush doubles
        let response = app
            .oneshot(post_json(
                "/api/v1/projects",
                json!({
                    "clientName": "Acme Corp",
                    "serviceType": "Web Development",
                    "quote": {
                        "serviceType": "Web Development",
                        "featureIds": ["responsive", "seo"],
                        "rush": true,
                        "adjustment": -300
                    }
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        assert_eq!(created["value"], 5000);
        let notes = created["notes"].as_str().unwrap();
        assert!(notes.contains("Mobile Responsive"));
        assert!(notes.contains("[RUSH ORDER APPLIED]"));
    }

    #[tokio::test]
    async fn create_rejects_blank_client_name() {
        let app = test_app();
        let response = app
            .oneshot(post_json(
                "/api/v1/projects",
                json!({
                    "clientName": "   ",
                    "serviceType": "Web Development",
                    "value": 100
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn patch_updates_status() {
        let app = test_app();

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/v1/projects",
                json!({
                    "clientName": "Acme Corp",
                    "serviceType": "Web Development",
                    "value": 3200
                }),
            ))
            .await
            .unwrap();
        let created = body_json(response).await;
        let id = created["id"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(patch_json(
                &format!("/api/v1/projects/{id}"),
                json!({"status": "Active"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let updated = body_json(response).await;
        assert_eq!(updated["status"], "Active");
    }

    #[tokio::test]
    async fn patch_unknown_project_is_404() {
        let app = test_app();
        let response = app
            .oneshot(patch_json(
                "/api/v1/projects/999",
                json!({"status": "Active"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn patch_with_no_fields_is_400() {
        let app = test_app();
        let response = app
            .oneshot(patch_json("/api/v1/projects/1", json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn login_then_session_visible() {
        let app = test_app();

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/v1/auth/login",
                json!({"email": "owner@nexgen.dev", "password": "hunter2"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let session = body_json(response).await;
        assert_eq!(session["user"]["email"], "owner@nexgen.dev");

        let response = app.oneshot(get_req("/api/v1/auth/session")).await.unwrap();
        let json = body_json(response).await;
        assert_eq!(json["user"]["email"], "owner@nexgen.dev");
    }

    #[tokio::test]
    async fn bad_login_is_401() {
        let app = test_app();
        let response = app
            .oneshot(post_json(
                "/api/v1/auth/login",
                json!({"email": "", "password": ""}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn quote_endpoint_prices_an_order() {
        let app = test_app();
        let response = app
            .oneshot(post_json(
                "/api/v1/pricing/quote",
                json!({
                    "serviceType": "AI Solutions",
                    "featureIds": ["rag", "responsive"],
                    "rush": false,
                    "adjustment": 0
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let quote = body_json(response).await;
        // responsive is a web add-on, ignored for AI orders
        assert_eq!(quote["total"], 4500);
        assert_eq!(quote["base"], 2500);
    }

    #[tokio::test]
    async fn features_filtered_by_service() {
        let app = test_app();
        let response = app
            .oneshot(get_req("/api/v1/pricing/features?service=Ad%20Campaign"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let features = json["features"].as_array().unwrap();
        assert!(!features.is_empty());
        assert!(features
            .iter()
            .all(|f| f["category"].is_null() || f["category"] == "Ad Campaign"));
    }

    #[tokio::test]
    async fn briefing_without_llm_returns_fixed_message() {
        let app = test_app();
        let response = app
            .oneshot(post_json("/api/v1/assistant/briefing", json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(
            json["briefing"],
            "Error: API Key missing. Unable to generate briefing."
        );
    }

    #[tokio::test]
    async fn stats_reflect_created_projects() {
        let app = test_app();

        for (name, value) in [("Acme", 1000), ("Globex", 2000)] {
            app.clone()
                .oneshot(post_json(
                    "/api/v1/projects",
                    json!({
                        "clientName": name,
                        "serviceType": "Web Development",
                        "value": value
                    }),
                ))
                .await
                .unwrap();
        }

        let response = app.oneshot(get_req("/api/v1/stats")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let stats = body_json(response).await;
        assert_eq!(stats["totalProjects"], 2);
        assert_eq!(stats["newLeads"], 2);
        assert_eq!(stats["pipelineValue"], 3000);
    }
}
