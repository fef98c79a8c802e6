use axum::{
    extract::Request,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::any::Any;
use std::sync::Arc;
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::error;

use crate::api::{ApiError, ErrorBody};
use crate::config::Config;
use crate::model::ModelRegistry;
use crate::predict::Predictors;

#[derive(Clone)]
pub struct AppState {
    pub models: Arc<ModelRegistry>,
    pub predictors: Arc<Predictors>,
}

impl AppState {
    pub fn new(config: &Config, models: ModelRegistry) -> Self {
        let predictors = Predictors::new(&models, config);
        Self {
            models: Arc::new(models),
            predictors: Arc::new(predictors),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/", get(crate::api::home))
        .route("/api/workout", post(crate::api::workout_recommendation))
        .route("/api/lifestyle", post(crate::api::lifestyle_recommendation))
        .route("/api/meal", post(crate::api::meal_recommendation))
        .route("/api/health", get(crate::api::health_check))
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(fallback_handler)
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state);

    // Path normalisation has to run before routing, so it wraps the
    // whole API router instead of sitting in its layer stack.
    Router::new()
        .fallback_service(api_routes)
        .layer(axum::middleware::from_fn(crate::middleware::normalize_path))
        .layer(axum::middleware::from_fn(crate::middleware::log_request))
        .layer(
            CorsLayer::new()
                .allow_origin(AnyOrigin)
                .allow_methods(AnyOrigin)
                .allow_headers(AnyOrigin),
        )
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

async fn fallback_handler(req: Request) -> Response {
    if req.method() == axum::http::Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    ApiError::NotFound.into_response()
}

async fn method_not_allowed(req: Request) -> Response {
    if req.method() == axum::http::Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    ApiError::MethodNotAllowed.into_response()
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!("Handler panicked: {}", detail);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CACHE_CONTROL, "no-store")],
        Json(ErrorBody::new(ApiError::Internal.to_string())),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::predict::fixtures;

    fn app(models: ModelRegistry) -> Router {
        build_router(AppState::new(&Config::default(), models))
    }

    fn loaded() -> ModelRegistry {
        ModelRegistry {
            workout: Some(fixtures::workout_bundle()),
            lifestyle: Some(fixtures::lifestyle_bundle()),
            meal: Some(fixtures::meal_bundle()),
        }
    }

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_workout_example() {
        let (status, body) = send(
            app(loaded()),
            post_json(
                "/api/workout",
                json!({
                    "age": 25, "gender": "Male", "bmi": 22.5, "activity_level": "Medium",
                    "health_condition": "None", "duration_minutes": 45, "calories_burned": 300
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert!(!body["recommended_workout"].as_str().unwrap().is_empty());
        let confidence = body["confidence"].as_f64().unwrap();
        assert!((0.0..=1.0).contains(&confidence));

        let top = body["top_recommendations"].as_array().unwrap();
        assert!(!top.is_empty() && top.len() <= 3);
        assert_eq!(top[0]["workout"], body["recommended_workout"]);
        assert_eq!(top[0]["confidence"].as_f64().unwrap(), confidence);
    }

    #[tokio::test]
    async fn test_lifestyle_and_meal() {
        let (status, body) = send(
            app(loaded()),
            post_json(
                "/api/lifestyle",
                json!({
                    "age": 30, "gender": "Female", "sleep_hours": 6.5, "recommended_sleep": 8.0,
                    "water_intake_liters": 1.8, "stress_level": "Moderate", "screen_time_hours": 5.2
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert!(body["recommendation"].is_string());
        assert!(body["top_recommendations"][0]["recommendation"].is_string());

        let (status, body) = send(
            app(loaded()),
            post_json(
                "/api/meal",
                json!({
                    "age": 28, "gender": "Female", "bmi_status": "Normal",
                    "goal": "Maintenance", "meal_type": "Lunch"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["recommended_meal"], "Grilled chicken salad");
        assert!(body["estimated_calories"].is_f64());
        assert!(body["top_recommendations"][0]["estimated_calories"].is_f64());
    }

    async fn assert_missing(uri: &str, body: Value, field: &str) {
        // No bundles loaded: reaching a predictor would answer "model not available".
        let (status, body) = send(app(ModelRegistry::default()), post_json(uri, body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(
            body,
            json!({"error": format!("Missing required field: {}", field), "status": "error"})
        );
    }

    #[tokio::test]
    async fn test_missing_field_skips_prediction() {
        assert_missing(
            "/api/meal",
            json!({"age": 28, "gender": "Female", "goal": "Maintenance"}),
            "bmi_status",
        )
        .await;
        assert_missing(
            "/api/workout",
            json!({
                "age": 25, "gender": "Male", "bmi": 22.5, "activity_level": "Medium",
                "health_condition": "None", "calories_burned": 300
            }),
            "duration_minutes",
        )
        .await;
        assert_missing(
            "/api/lifestyle",
            json!({
                "age": 30, "gender": "Female", "sleep_hours": 6.5, "recommended_sleep": 8.0,
                "stress_level": "Moderate", "screen_time_hours": 5.2
            }),
            "water_intake_liters",
        )
        .await;
    }

    #[tokio::test]
    async fn test_null_counts_as_missing() {
        assert_missing(
            "/api/workout",
            json!({
                "age": 25, "gender": null, "bmi": 22.5, "activity_level": "Medium",
                "health_condition": "None", "duration_minutes": 45, "calories_burned": 300
            }),
            "gender",
        )
        .await;
        assert_missing(
            "/api/lifestyle",
            json!({
                "age": 30, "gender": "Female", "sleep_hours": null, "recommended_sleep": 8.0,
                "water_intake_liters": 1.8, "stress_level": "Moderate", "screen_time_hours": 5.2
            }),
            "sleep_hours",
        )
        .await;
    }

    #[tokio::test]
    async fn test_wrong_method() {
        let (status, body) = send(app(loaded()), get("/api/workout")).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body, json!({"error": "Method not allowed", "status": "error"}));

        let (status, body) = send(app(loaded()), post_json("/api/health", json!({}))).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["status"], "error");
    }

    #[tokio::test]
    async fn test_invalid_body() {
        let req = Request::builder()
            .method("POST")
            .uri("/api/workout")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(app(loaded()), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");

        let (status, _) = send(app(loaded()), post_json("/api/workout", json!([1, 2]))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_model_unavailable() {
        let mut models = loaded();
        models.lifestyle = None;
        let (status, body) = send(
            app(models),
            post_json(
                "/api/lifestyle",
                json!({
                    "age": 30, "gender": "Female", "sleep_hours": 6.5, "recommended_sleep": 8.0,
                    "water_intake_liters": 1.8, "stress_level": "Moderate", "screen_time_hours": 5.2
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"error": "Lifestyle model not available", "status": "error"})
        );
    }

    #[tokio::test]
    async fn test_health_reflects_loaded_models() {
        let mut models = loaded();
        models.meal = None;
        let (status, body) = send(app(models), get("/api/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "workout_model": true, "lifestyle_model": true,
                "meal_model": false, "status": "healthy"
            })
        );
    }

    #[tokio::test]
    async fn test_not_found() {
        let (status, body) = send(app(loaded()), get("/api/unknown")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Endpoint not found", "status": "error"}));
    }

    #[tokio::test]
    async fn test_duplicate_slashes_are_collapsed() {
        let (status, body) = send(app(loaded()), get("/api//health/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_documentation_page() {
        let response = app(loaded()).oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let page = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(page.contains("/api/workout"));
    }
}
