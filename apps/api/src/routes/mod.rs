pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::matching::handlers as matching;
use crate::profile::handlers as profile;
use crate::roadmap::handlers as roadmap;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Role catalog
        .route("/api/v1/roles", get(matching::handle_search_roles))
        // Competency profile
        .route("/api/v1/people/:id/profile", get(profile::handle_get_profile))
        .route(
            "/api/v1/people/:id/profile/refresh",
            post(profile::handle_refresh_profile),
        )
        // Matching
        .route("/api/v1/people/:id/matches", get(matching::handle_rank))
        .route(
            "/api/v1/people/:id/matches/compare",
            post(matching::handle_compare),
        )
        .route(
            "/api/v1/people/:id/matches/:role_id",
            get(matching::handle_score),
        )
        .route(
            "/api/v1/people/:id/matches/:role_id/metrics",
            get(matching::handle_metrics),
        )
        // Roadmaps
        .route("/api/v1/people/:id/roadmaps", post(roadmap::handle_generate))
        .route(
            "/api/v1/people/:id/roadmaps/active",
            get(roadmap::handle_get_active),
        )
        .route(
            "/api/v1/roadmaps/:id",
            patch(roadmap::handle_update).delete(roadmap::handle_delete),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use chrono::Utc;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::config::Config;
    use crate::llm_client::DisabledNarrative;
    use crate::matching::test_support::role_named;
    use crate::models::raw::{InterestProfile, RawDomainRecords, SocialEmotionalRating};
    use crate::models::role::Importance;
    use crate::roadmap::builder::RoadmapBuilder;
    use crate::store::memory::MemoryStore;
    use crate::store::Stores;

    struct TestApp {
        router: Router,
        person_id: Uuid,
        role_id: Uuid,
    }

    fn app() -> TestApp {
        let store = Arc::new(MemoryStore::new());
        let person_id = Uuid::new_v4();
        store.add_person(RawDomainRecords {
            person_id,
            display_name: Some("Ana".to_string()),
            social_emotional: vec![SocialEmotionalRating {
                dimension: "teamwork".to_string(),
                rating: 9,
                recorded_at: Utc::now(),
            }],
            interests: Some(InterestProfile {
                interests: vec!["coding".to_string()],
                talents: vec![],
                recorded_at: Utc::now(),
            }),
            ..Default::default()
        });
        let role = role_named(
            "Software Engineer",
            &[
                ("programming", 8, Importance::Critical, 0.7),
                ("teamwork", 6, Importance::Medium, 0.3),
            ],
        );
        let role_id = role.id;
        store.add_role(role);
        store.add_role(role_named("Team Coach", &[("teamwork", 7, Importance::High, 1.0)]));

        let state = AppState {
            stores: Stores::memory(store),
            roadmap_builder: RoadmapBuilder::new(Arc::new(DisabledNarrative), Duration::from_secs(1), false),
            config: Config::for_tests(),
        };
        TestApp {
            router: build_router(state),
            person_id,
            role_id,
        }
    }

    async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(v) => builder
                .header("content-type", "application/json")
                .body(Body::from(v.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let app = app();
        let (status, body) = send(&app.router, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["service"], "pathwise-api");
    }

    #[tokio::test]
    async fn test_profile_and_matches() {
        let app = app();
        let uri = format!("/api/v1/people/{}/profile", app.person_id);
        let (status, body) = send(&app.router, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["entries"].as_array().unwrap().len(), 2);

        let uri = format!("/api/v1/people/{}/matches?limit=1", app.person_id);
        let (status, body) = send(&app.router, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        let matches = body["matches"].as_array().unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0]["role_name"], "Team Coach");
        assert_eq!(matches[0]["compatibility_tier"], "EXCELLENT");

        let uri = format!("/api/v1/people/{}/matches/{}", app.person_id, app.role_id);
        let (status, body) = send(&app.router, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["gaps"][0]["competency_id"], "programming");
        assert_eq!(body["gaps"][0]["importance"], "CRITICAL");
    }

    #[tokio::test]
    async fn test_errors_map_to_status_codes() {
        let app = app();
        let uri = format!("/api/v1/people/{}/matches", Uuid::new_v4());
        let (status, body) = send(&app.router, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");

        let uri = format!("/api/v1/people/{}/matches/compare", app.person_id);
        let (status, body) = send(&app.router, Method::POST, &uri, Some(json!({"role_ids": []}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_roadmap_lifecycle() {
        let app = app();
        let uri = format!("/api/v1/people/{}/roadmaps", app.person_id);
        let (status, created) = send(
            &app.router,
            Method::POST,
            &uri,
            Some(json!({"role_id": app.role_id, "custom_goals": ["Ship an app"]})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["status"], "ACTIVE");
        assert!(!created["recommendations"].as_array().unwrap().is_empty());
        let id = created["id"].as_str().unwrap().to_string();

        let uri = format!("/api/v1/people/{}/roadmaps/active", app.person_id);
        let (status, active) = send(&app.router, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(active["id"], id.as_str());

        let uri = format!("/api/v1/roadmaps/{id}");
        let (status, _) = send(&app.router, Method::PATCH, &uri, Some(json!({"progress_percent": 101}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, updated) = send(&app.router, Method::PATCH, &uri, Some(json!({"status": "COMPLETED"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["status"], "COMPLETED");

        let (status, _) = send(&app.router, Method::PATCH, &uri, Some(json!({"progress_percent": 10}))).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = send(&app.router, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app.router, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_role_search() {
        let app = app();
        let (status, body) = send(&app.router, Method::GET, "/api/v1/roles?search=coach", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
        let (_, body) = send(&app.router, Method::GET, "/api/v1/roles", None).await;
        assert_eq!(body.as_array().unwrap().len(), 2);
    }
}
