pub mod lifestyle;
pub mod meal;
pub mod request;
pub mod workout;

pub use lifestyle::{LifestyleOption, LifestylePrediction, LifestylePredictor, LifestyleSettings};
pub use meal::{MealOption, MealPrediction, MealPredictor};
pub use request::{LifestyleRequest, MealRequest, PredictionRequest, RequestError, WorkoutRequest};
pub use workout::{WorkoutOption, WorkoutPrediction, WorkoutPredictor};

use std::cmp::Ordering;

use crate::config::Config;
use crate::model::{ArtifactError, Domain, LabelEncoder, ModelRegistry};

pub const DEFAULT_TOP_K: usize = 3;

#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    #[error("{} model not available", display_name(.0))]
    ModelUnavailable(Domain),
    #[error("Prediction failed: {0}")]
    Transform(String),
    #[error("Prediction failed: {0}")]
    Inference(String),
}

fn display_name(domain: &Domain) -> &'static str {
    domain.display_name()
}

impl PredictError {
    pub(crate) fn transform(e: ArtifactError) -> Self {
        PredictError::Transform(e.to_string())
    }

    pub(crate) fn inference(e: ArtifactError) -> Self {
        PredictError::Inference(e.to_string())
    }
}

/// One entry of a ranked model output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ranked {
    pub index: usize,
    pub confidence: f64,
}

/// The `k` highest-probability classes, highest first. Equal probabilities
/// keep class index order.
pub fn top_k(probabilities: &[f64], k: usize) -> Vec<Ranked> {
    let mut ranked: Vec<Ranked> = probabilities
        .iter()
        .enumerate()
        .map(|(index, &confidence)| Ranked { index, confidence })
        .collect();
    ranked.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
    });
    ranked.truncate(k);
    ranked
}

/// Check that a classifier produced a usable distribution.
pub(crate) fn check_probabilities(probabilities: &[f64]) -> Result<(), PredictError> {
    if probabilities.is_empty() {
        return Err(PredictError::Inference("model produced no classes".to_string()));
    }
    if let Some(p) = probabilities.iter().find(|p| !p.is_finite() || **p < 0.0) {
        return Err(PredictError::Inference(format!(
            "model produced invalid probability {}",
            p
        )));
    }
    Ok(())
}

/// Rank a classifier's output and decode the top entries to labels.
/// The result is never empty.
pub(crate) fn rank_labels(
    probabilities: &[f64],
    labels: &LabelEncoder,
    k: usize,
) -> Result<Vec<(String, f64)>, PredictError> {
    check_probabilities(probabilities)?;
    top_k(probabilities, k.max(1))
        .into_iter()
        .map(|r| {
            let label = labels
                .inverse_transform(r.index)
                .map_err(PredictError::inference)?;
            Ok((label.to_string(), r.confidence))
        })
        .collect()
}

pub(crate) fn check_features(names: &[&str], values: &[f64]) -> Result<(), PredictError> {
    for (name, v) in names.iter().zip(values) {
        if !v.is_finite() {
            return Err(PredictError::Transform(format!(
                "feature {} is not finite ({})",
                name, v
            )));
        }
    }
    Ok(())
}

/// Predictors for all domains, each holding its own bundle (if loaded).
#[derive(Debug, Clone)]
pub struct Predictors {
    pub workout: WorkoutPredictor,
    pub lifestyle: LifestylePredictor,
    pub meal: MealPredictor,
}

impl Predictors {
    pub fn new(models: &ModelRegistry, config: &Config) -> Self {
        let k = config.top_k.max(1);
        Self {
            workout: WorkoutPredictor::new(models.workout.clone(), k),
            lifestyle: LifestylePredictor::new(
                models.lifestyle.clone(),
                LifestyleSettings::from(&config.lifestyle),
                k,
            ),
            meal: MealPredictor::new(models.meal.clone(), k),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Small in-memory bundles with hand-set weights.

    use std::sync::Arc;

    use crate::model::*;

    /// Single softmax layer over `inputs` features where class `c` takes
    /// its logit from weights[c].
    pub fn softmax_layer(inputs: usize, logits: &[Vec<f64>]) -> Network {
        let classes = logits.len();
        let weights = (0..inputs)
            .map(|i| (0..classes).map(|c| logits[c][i]).collect())
            .collect();
        Network {
            name: "fixture".to_string(),
            layers: vec![DenseLayer {
                weights,
                bias: vec![0.0; classes],
                activation: Activation::Softmax,
            }],
        }
    }

    pub fn workout_bundle() -> Arc<WorkoutBundle> {
        // Columns: age, gender, bmi, activity_level, health_condition,
        // duration_minutes, calories_burned.
        let model = softmax_layer(
            WORKOUT_FEATURES,
            &[
                vec![0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0],
                vec![0.0, 0.0, 0.0, 0.5, 0.0, 0.0, 0.0],
                vec![0.5, 0.0, 0.5, 0.0, 0.0, -1.0, 0.0],
                vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            ],
        );
        let bundle = WorkoutBundle {
            model,
            scaler: StandardScaler::new(vec![35.0, 25.0, 40.0, 300.0], vec![10.0, 4.0, 15.0, 120.0]),
            encoders: WorkoutEncoders {
                gender: LabelEncoder::new(["Female", "Male"]),
                activity_level: LabelEncoder::new(["High", "Low", "Medium"]),
                health_condition: LabelEncoder::new(["Diabetes", "Hypertension", "None"]),
                recommended_workout: LabelEncoder::new(["Cardio", "HIIT", "Walking", "Yoga"]),
            },
        };
        bundle.validate().unwrap();
        Arc::new(bundle)
    }

    pub fn lifestyle_bundle() -> Arc<LifestyleBundle> {
        let encoders = LifestyleEncoders {
            gender: OneHotEncoder::new(["Female", "Male"]),
            stress_level: LabelEncoder::new(["High", "Low", "Moderate"]),
            recommendation: LabelEncoder::new(["Drink more water", "Reduce screen time", "Sleep more"]),
        };
        let width = LIFESTYLE_BASE_FEATURES + encoders.gender.width();
        // Columns: age, sleep_hours, recommended_sleep, water_intake_liters,
        // screen_time_hours, sleep_deficit, sleep_ratio, water_deficit,
        // stress_level_encoded, gender_Female, gender_Male.
        let model = softmax_layer(
            width,
            &[
                vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0],
                vec![0.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
                vec![0.0, 0.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            ],
        );
        let mut mean = vec![0.0; width];
        mean[5] = 1.0;
        mean[7] = 0.5;
        let bundle = LifestyleBundle {
            model,
            scaler: StandardScaler::new(mean, vec![1.0; width]),
            encoders,
        };
        bundle.validate().unwrap();
        Arc::new(bundle)
    }

    pub fn meal_bundle() -> Arc<MealBundle> {
        let feature_encoder = MealFeatureEncoder {
            gender: OneHotEncoder::new(["Female", "Male"]),
            bmi_status: OneHotEncoder::new(["Normal", "Overweight", "Underweight"]),
            goal: OneHotEncoder::new(["Maintenance", "Muscle Gain", "Weight Loss"]),
            meal_type: OneHotEncoder::new(["Breakfast", "Dinner", "Lunch"]),
        };
        let width = feature_encoder.width();
        // Columns: age, gender x2, bmi_status x3, goal x3, meal_type x3.
        let meal_model = softmax_layer(
            width,
            &[
                vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0],
                vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 2.0],
                vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 0.0],
                vec![0.0; 12],
            ],
        );
        let mut calories = vec![vec![0.0]; width];
        calories[0] = vec![50.0];
        calories[10] = vec![200.0];
        let calories_model = Network {
            name: "calories".to_string(),
            layers: vec![DenseLayer {
                weights: calories,
                bias: vec![450.0],
                activation: Activation::Linear,
            }],
        };
        let bundle = MealBundle {
            feature_encoder,
            scaler: StandardScaler::new(vec![0.0; width], vec![1.0; width]),
            encoders: MealEncoders {
                meal_items: LabelEncoder::new([
                    "Oatmeal with fruit",
                    "Grilled chicken salad",
                    "Protein shake",
                    "Vegetable soup",
                ]),
            },
            meal_model,
            calories_model,
        };
        bundle.validate().unwrap();
        Arc::new(bundle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_k_orders_descending() {
        let ranked = top_k(&[0.1, 0.5, 0.15, 0.25], 3);
        let indices: Vec<usize> = ranked.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![1, 3, 2]);
    }

    #[test]
    fn test_top_k_ties_keep_index_order() {
        let ranked = top_k(&[0.2, 0.4, 0.2, 0.2], 3);
        let indices: Vec<usize> = ranked.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![1, 0, 2]);
    }

    #[test]
    fn test_top_k_fewer_classes_than_k() {
        let ranked = top_k(&[0.7, 0.3], 3);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].index, 0);
    }

    #[test]
    fn test_unavailable_message() {
        assert_eq!(
            PredictError::ModelUnavailable(Domain::Meal).to_string(),
            "Meal plan model not available"
        );
        assert_eq!(
            PredictError::ModelUnavailable(Domain::Workout).to_string(),
            "Workout model not available"
        );
    }

    #[test]
    fn test_invalid_probabilities() {
        assert!(check_probabilities(&[0.5, f64::NAN]).is_err());
        assert!(check_probabilities(&[0.5, -0.1]).is_err());
        assert!(check_probabilities(&[]).is_err());
        assert!(check_probabilities(&[0.0, 1.0]).is_ok());
    }
}
