use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{Html, IntoResponse},
    Json,
};
use serde_json::{Map, Value};

use super::docs::DOCUMENTATION_PAGE;
use super::types::*;
use crate::model::Domain;
use crate::predict::{
    LifestylePrediction, LifestyleRequest, MealPrediction, MealRequest, PredictionRequest,
    WorkoutPrediction, WorkoutRequest,
};
use crate::server::AppState;

type Payload = Result<Json<Value>, JsonRejection>;

fn json_object(payload: Payload) -> Result<Map<String, Value>, ApiError> {
    let Json(value) = payload.map_err(|e| ApiError::InvalidBody(e.body_text()))?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(ApiError::InvalidBody("expected a JSON object".to_string())),
    }
}

fn parse<T: PredictionRequest>(payload: Payload) -> Result<T, ApiError> {
    let fields = json_object(payload)?;
    Ok(T::from_fields(&fields)?)
}

pub async fn home() -> Html<&'static str> {
    Html(DOCUMENTATION_PAGE)
}

pub async fn workout_recommendation(
    State(state): State<AppState>,
    payload: Payload,
) -> Result<Json<Success<WorkoutPrediction>>, ApiError> {
    let req: WorkoutRequest = parse(payload)?;
    let prediction = state.predictors.workout.predict(&req)?;
    Ok(Json(Success::new(prediction)))
}

pub async fn lifestyle_recommendation(
    State(state): State<AppState>,
    payload: Payload,
) -> Result<Json<Success<LifestylePrediction>>, ApiError> {
    let req: LifestyleRequest = parse(payload)?;
    let prediction = state.predictors.lifestyle.predict(&req)?;
    Ok(Json(Success::new(prediction)))
}

pub async fn meal_recommendation(
    State(state): State<AppState>,
    payload: Payload,
) -> Result<Json<Success<MealPrediction>>, ApiError> {
    let req: MealRequest = parse(payload)?;
    let prediction = state.predictors.meal.predict(&req)?;
    Ok(Json(Success::new(prediction)))
}

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let models = &state.models;
    (
        [(header::CACHE_CONTROL, "no-cache, no-store")],
        Json(HealthStatus {
            workout_model: models.is_available(Domain::Workout),
            lifestyle_model: models.is_available(Domain::Lifestyle),
            meal_model: models.is_available(Domain::Meal),
            status: "healthy",
        }),
    )
}
