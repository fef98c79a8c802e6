use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

use super::{check_features, rank_labels, LifestyleRequest, PredictError};
use crate::config::LifestyleConfig;
use crate::model::{Domain, LifestyleBundle, LIFESTYLE_BASE_NAMES};

#[derive(Debug, Clone, PartialEq)]
pub struct LifestyleSettings {
    /// Daily water target in liters used for `water_deficit`.
    pub recommended_water: f64,
    /// Stress level substituted for values the encoder never saw.
    pub stress_fallback: String,
}

impl Default for LifestyleSettings {
    fn default() -> Self {
        Self::from(&LifestyleConfig::default())
    }
}

impl From<&LifestyleConfig> for LifestyleSettings {
    fn from(config: &LifestyleConfig) -> Self {
        Self {
            recommended_water: config.recommended_water,
            stress_fallback: config.stress_fallback.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LifestyleOption {
    pub recommendation: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LifestylePrediction {
    pub recommendation: String,
    pub confidence: f64,
    pub top_recommendations: Vec<LifestyleOption>,
}

#[derive(Debug, Clone)]
pub struct LifestylePredictor {
    bundle: Option<Arc<LifestyleBundle>>,
    settings: LifestyleSettings,
    top_k: usize,
}

impl LifestylePredictor {
    pub fn new(bundle: Option<Arc<LifestyleBundle>>, settings: LifestyleSettings, top_k: usize) -> Self {
        Self {
            bundle,
            settings,
            top_k,
        }
    }

    /// Raw inputs, derived sleep and water features and the encoded
    /// stress level, followed by one-hot gender. The whole vector is
    /// standardised.
    pub fn transform(
        bundle: &LifestyleBundle,
        settings: &LifestyleSettings,
        req: &LifestyleRequest,
    ) -> Result<Vec<f64>, PredictError> {
        let enc = &bundle.encoders;

        let sleep_deficit = req.recommended_sleep - req.sleep_hours;
        let sleep_ratio = req.sleep_hours / req.recommended_sleep;
        let water_deficit = settings.recommended_water - req.water_intake_liters;
        let stress = enc
            .stress_level
            .transform_or(&req.stress_level, &settings.stress_fallback);

        let mut features = Vec::with_capacity(bundle.feature_width());
        features.extend_from_slice(&[
            req.age,
            req.sleep_hours,
            req.recommended_sleep,
            req.water_intake_liters,
            req.screen_time_hours,
            sleep_deficit,
            sleep_ratio,
            water_deficit,
            stress as f64,
        ]);
        check_features(&LIFESTYLE_BASE_NAMES, &features)?;
        enc.gender.encode_into(&req.gender, &mut features);

        bundle
            .scaler
            .transform(&mut features)
            .map_err(PredictError::transform)?;
        Ok(features)
    }

    pub fn predict(&self, req: &LifestyleRequest) -> Result<LifestylePrediction, PredictError> {
        let bundle = self
            .bundle
            .as_deref()
            .ok_or(PredictError::ModelUnavailable(Domain::Lifestyle))?;

        let result = self.run(bundle, req);
        if let Err(ref e) = result {
            warn!(domain = %Domain::Lifestyle, "{}", e);
        }
        result
    }

    fn run(&self, bundle: &LifestyleBundle, req: &LifestyleRequest) -> Result<LifestylePrediction, PredictError> {
        let features = Self::transform(bundle, &self.settings, req)?;
        debug!(domain = %Domain::Lifestyle, width = features.len(), "encoded features");

        let probabilities = bundle
            .model
            .predict(&features)
            .map_err(PredictError::inference)?;
        let ranked = rank_labels(&probabilities, &bundle.encoders.recommendation, self.top_k)?;

        let (recommendation, confidence) = ranked[0].clone();
        Ok(LifestylePrediction {
            recommendation,
            confidence,
            top_recommendations: ranked
                .into_iter()
                .map(|(recommendation, confidence)| LifestyleOption {
                    recommendation,
                    confidence,
                })
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predict::fixtures;

    fn sample() -> LifestyleRequest {
        LifestyleRequest {
            age: 30.0,
            gender: "Female".to_string(),
            sleep_hours: 6.0,
            recommended_sleep: 8.0,
            water_intake_liters: 1.5,
            stress_level: "Moderate".to_string(),
            screen_time_hours: 0.5,
        }
    }

    #[test]
    fn test_derived_features() {
        let bundle = fixtures::lifestyle_bundle();
        let settings = LifestyleSettings::default();
        let features = LifestylePredictor::transform(&bundle, &settings, &sample()).unwrap();

        assert_eq!(features.len(), 11);
        // Fixture scaler subtracts 1.0 from sleep_deficit and 0.5 from water_deficit.
        assert_eq!(features[5], 1.0);
        assert_eq!(features[6], 0.75);
        assert_eq!(features[7], 0.0);
        assert_eq!(features[8], 2.0);
        assert_eq!(&features[9..], &[1.0, 0.0]);
    }

    #[test]
    fn test_feature_names_follow_column_order() {
        let bundle = fixtures::lifestyle_bundle();
        let names = bundle.feature_names();
        assert_eq!(names.len(), bundle.feature_width());
        assert_eq!(names[8], "stress_level_encoded");
        assert_eq!(names[9], "gender_Female");
        assert_eq!(names[10], "gender_Male");
    }

    #[test]
    fn test_unknown_stress_level_uses_fallback() {
        let bundle = fixtures::lifestyle_bundle();
        let settings = LifestyleSettings::default();
        let mut req = sample();
        req.stress_level = "Panicked".to_string();
        req.gender = "Nonbinary".to_string();
        let features = LifestylePredictor::transform(&bundle, &settings, &req).unwrap();
        // "Moderate" is code 2; unknown gender takes the first category.
        assert_eq!(features[8], 2.0);
        assert_eq!(&features[9..], &[1.0, 0.0]);

        let predictor = LifestylePredictor::new(Some(bundle), settings, 3);
        assert!(predictor.predict(&req).is_ok());
    }

    #[test]
    fn test_zero_recommended_sleep_is_a_transform_error() {
        let predictor = LifestylePredictor::new(
            Some(fixtures::lifestyle_bundle()),
            LifestyleSettings::default(),
            3,
        );
        let mut req = sample();
        req.recommended_sleep = 0.0;
        let err = predictor.predict(&req).unwrap_err();
        assert!(matches!(err, PredictError::Transform(_)));
        assert!(err.to_string().starts_with("Prediction failed: "));
    }

    #[test]
    fn test_prediction() {
        let predictor = LifestylePredictor::new(
            Some(fixtures::lifestyle_bundle()),
            LifestyleSettings::default(),
            3,
        );
        let mut req = sample();
        req.sleep_hours = 4.0;
        let prediction = predictor.predict(&req).unwrap();
        assert_eq!(prediction.recommendation, "Sleep more");
        assert_eq!(prediction.top_recommendations.len(), 3);
        assert_eq!(prediction.confidence, prediction.top_recommendations[0].confidence);
    }
}
