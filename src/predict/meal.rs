use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

use super::{check_features, rank_labels, MealRequest, PredictError};
use crate::model::{Domain, MealBundle};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealOption {
    pub meal: String,
    pub confidence: f64,
    pub estimated_calories: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealPrediction {
    pub recommended_meal: String,
    pub estimated_calories: f64,
    pub confidence: f64,
    pub top_recommendations: Vec<MealOption>,
}

#[derive(Debug, Clone)]
pub struct MealPredictor {
    bundle: Option<Arc<MealBundle>>,
    top_k: usize,
}

impl MealPredictor {
    pub fn new(bundle: Option<Arc<MealBundle>>, top_k: usize) -> Self {
        Self { bundle, top_k }
    }

    /// `age` followed by one-hot gender, bmi_status, goal and meal_type,
    /// then standardised as a whole.
    pub fn transform(bundle: &MealBundle, req: &MealRequest) -> Result<Vec<f64>, PredictError> {
        let enc = &bundle.feature_encoder;

        check_features(&["age"], &[req.age])?;
        let mut features = Vec::with_capacity(enc.width());
        features.push(req.age);
        enc.gender.encode_into(&req.gender, &mut features);
        enc.bmi_status.encode_into(&req.bmi_status, &mut features);
        enc.goal.encode_into(&req.goal, &mut features);
        enc.meal_type.encode_into(&req.meal_type, &mut features);

        bundle
            .scaler
            .transform(&mut features)
            .map_err(PredictError::transform)?;
        Ok(features)
    }

    pub fn predict(&self, req: &MealRequest) -> Result<MealPrediction, PredictError> {
        let bundle = self
            .bundle
            .as_deref()
            .ok_or(PredictError::ModelUnavailable(Domain::Meal))?;

        let result = self.run(bundle, req);
        if let Err(ref e) = result {
            warn!(domain = %Domain::Meal, "{}", e);
        }
        result
    }

    fn run(&self, bundle: &MealBundle, req: &MealRequest) -> Result<MealPrediction, PredictError> {
        let features = Self::transform(bundle, req)?;
        debug!(domain = %Domain::Meal, width = features.len(), "encoded features");

        let probabilities = bundle
            .meal_model
            .predict(&features)
            .map_err(PredictError::inference)?;
        let ranked = rank_labels(&probabilities, &bundle.encoders.meal_items, self.top_k)?;

        // The regressor only sees the user features, so every ranked meal
        // carries the same estimate. Whether estimates should depend on the
        // meal label is unresolved; this keeps the flat estimate.
        let estimated_calories = bundle
            .calories_model
            .predict_scalar(&features)
            .map_err(PredictError::inference)?;
        if !estimated_calories.is_finite() {
            return Err(PredictError::Inference(format!(
                "calorie estimate is not finite ({})",
                estimated_calories
            )));
        }

        let (recommended_meal, confidence) = ranked[0].clone();
        Ok(MealPrediction {
            recommended_meal,
            estimated_calories,
            confidence,
            top_recommendations: ranked
                .into_iter()
                .map(|(meal, confidence)| MealOption {
                    meal,
                    confidence,
                    estimated_calories,
                })
                .collect(),
        })
    }
}
