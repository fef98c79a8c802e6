use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::predict::{PredictError, RequestError};

/// Successful prediction body: the domain fields plus `"status": "success"`.
#[derive(Debug, Clone, Serialize)]
pub struct Success<T> {
    #[serde(flatten)]
    pub data: T,
    pub status: &'static str,
}

impl<T> Success<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            status: "success",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub status: &'static str,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            status: "error",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub workout_model: bool,
    pub lifestyle_model: bool,
    pub meal_model: bool,
    pub status: &'static str,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error("Invalid JSON body: {0}")]
    InvalidBody(String),
    #[error(transparent)]
    Prediction(#[from] PredictError),
    #[error("Endpoint not found")]
    NotFound,
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    /// Predictor failures are reported in a 200 response; the error body
    /// tells the client the prediction did not happen.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Request(_) | ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Prediction(_) => StatusCode::OK,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(ErrorBody::new(self.to_string()))).into_response()
    }
}
