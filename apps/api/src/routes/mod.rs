pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::generation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/programs/generate",
            post(handlers::handle_generate_program),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::generation::client::GenerationClient;
    use crate::generation::generator::{EmptySessionPolicy, ProgramGenerator};
    use crate::generation::retry::RetryPolicy;
    use crate::generation::test_support::{sample_catalog, ScriptedProvider, StaticCatalog};
    use crate::models::program::{GeneratedProgram, ProgramTemplate};

    fn app(policy: EmptySessionPolicy) -> Router {
        let generator = ProgramGenerator::new(
            Arc::new(StaticCatalog::new(sample_catalog())),
            GenerationClient::new(
                Arc::new(ScriptedProvider::failing()),
                RetryPolicy::new(1, Duration::ZERO),
            ),
            policy,
            Some(5),
        );
        build_router(AppState {
            generator: Arc::new(generator),
        })
    }

    fn generate_request(body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/programs/generate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(EmptySessionPolicy::Allow)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_generate_returns_program() {
        let body = serde_json::json!({
            "profile": {
                "experience_level": "INTERMEDIATE",
                "training_frequency": 5,
                "goals": ["STRENGTH"],
                "weight": 80.0,
                "target_weight": null,
                "training_environment": "GYM"
            }
        });

        let response = app(EmptySessionPolicy::Allow)
            .oneshot(generate_request(body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let program: GeneratedProgram = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(program.template, ProgramTemplate::PplUpperLower);
        let names: Vec<&str> = program.sessions.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Push", "Pull", "Legs", "Upper", "Lower"]);
    }

    #[tokio::test]
    async fn test_generate_honours_template_override() {
        let body = serde_json::json!({
            "profile": {
                "experience_level": "ADVANCED",
                "training_frequency": 3,
                "weight": null,
                "target_weight": null,
                "training_environment": null
            },
            "template": "CUSTOM"
        });

        let response = app(EmptySessionPolicy::Allow)
            .oneshot(generate_request(body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let program: GeneratedProgram = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(program.template, ProgramTemplate::Custom);
        assert_eq!(program.sessions.len(), 3);
    }

    #[tokio::test]
    async fn test_blank_goal_is_rejected() {
        let body = serde_json::json!({
            "profile": {
                "experience_level": "BEGINNER",
                "training_frequency": 2,
                "goals": ["  "],
                "weight": null,
                "target_weight": null,
                "training_environment": null
            }
        });

        let response = app(EmptySessionPolicy::Allow)
            .oneshot(generate_request(body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_reject_policy_maps_to_422() {
        // No bodyweight beginner exercise in the sample catalog trains "Pull".
        let body = serde_json::json!({
            "profile": {
                "experience_level": "BEGINNER",
                "training_frequency": 3,
                "body_weight_only": true,
                "weight": null,
                "target_weight": null,
                "training_environment": "HOME"
            }
        });

        let response = app(EmptySessionPolicy::Reject)
            .oneshot(generate_request(body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
