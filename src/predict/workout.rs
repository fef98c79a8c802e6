use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

use super::{check_features, rank_labels, PredictError, WorkoutRequest};
use crate::model::{Domain, WorkoutBundle};

/// Training-time column order of the workout model input.
pub const FEATURE_NAMES: [&str; 7] = [
    "age",
    "gender",
    "bmi",
    "activity_level",
    "health_condition",
    "duration_minutes",
    "calories_burned",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutOption {
    pub workout: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutPrediction {
    pub recommended_workout: String,
    pub confidence: f64,
    pub top_recommendations: Vec<WorkoutOption>,
}

#[derive(Debug, Clone)]
pub struct WorkoutPredictor {
    bundle: Option<Arc<WorkoutBundle>>,
    top_k: usize,
}

impl WorkoutPredictor {
    pub fn new(bundle: Option<Arc<WorkoutBundle>>, top_k: usize) -> Self {
        Self { bundle, top_k }
    }

    /// Build the model input. Categorical columns are label-encoded in
    /// place (unknown values take the first fitted class) and only the
    /// four numeric columns are standardised.
    pub fn transform(bundle: &WorkoutBundle, req: &WorkoutRequest) -> Result<Vec<f64>, PredictError> {
        let enc = &bundle.encoders;

        let mut numeric = [req.age, req.bmi, req.duration_minutes, req.calories_burned];
        bundle
            .scaler
            .transform(&mut numeric)
            .map_err(PredictError::transform)?;
        let [age, bmi, duration_minutes, calories_burned] = numeric;

        let features = vec![
            age,
            enc.gender.transform_or_first(&req.gender) as f64,
            bmi,
            enc.activity_level.transform_or_first(&req.activity_level) as f64,
            enc.health_condition.transform_or_first(&req.health_condition) as f64,
            duration_minutes,
            calories_burned,
        ];
        check_features(&FEATURE_NAMES, &features)?;
        Ok(features)
    }

    pub fn predict(&self, req: &WorkoutRequest) -> Result<WorkoutPrediction, PredictError> {
        let bundle = self
            .bundle
            .as_deref()
            .ok_or(PredictError::ModelUnavailable(Domain::Workout))?;

        let result = self.run(bundle, req);
        if let Err(ref e) = result {
            warn!(domain = %Domain::Workout, "{}", e);
        }
        result
    }

    fn run(&self, bundle: &WorkoutBundle, req: &WorkoutRequest) -> Result<WorkoutPrediction, PredictError> {
        let features = Self::transform(bundle, req)?;
        debug!(domain = %Domain::Workout, width = features.len(), "encoded features");

        let probabilities = bundle
            .model
            .predict(&features)
            .map_err(PredictError::inference)?;
        let ranked = rank_labels(
            &probabilities,
            &bundle.encoders.recommended_workout,
            self.top_k,
        )?;

        let (recommended_workout, confidence) = ranked[0].clone();
        Ok(WorkoutPrediction {
            recommended_workout,
            confidence,
            top_recommendations: ranked
                .into_iter()
                .map(|(workout, confidence)| WorkoutOption { workout, confidence })
                .collect(),
        })
    }
}
