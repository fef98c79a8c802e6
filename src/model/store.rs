use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

use super::{ArtifactError, Domain, LabelEncoder, Network, OneHotEncoder, StandardScaler};

pub const WORKOUT_MODEL_FILE: &str = "best_workout_model.json";
pub const WORKOUT_SCALER_FILE: &str = "scaler.json";
pub const WORKOUT_ENCODERS_FILE: &str = "encoders.json";

pub const LIFESTYLE_MODEL_FILE: &str = "lifestyle_nn_model.json";
pub const LIFESTYLE_SCALER_FILE: &str = "lifestyle_scaler.json";
pub const LIFESTYLE_ENCODERS_FILE: &str = "lifestyle_encoders.json";

pub const MEAL_FEATURE_ENCODER_FILE: &str = "meal_feature_encoder.json";
pub const MEAL_SCALER_FILE: &str = "meal_scaler.json";
pub const MEAL_ENCODERS_FILE: &str = "meal_encoders.json";
pub const MEAL_ITEMS_MODEL_FILE: &str = "meal_items_model.json";
pub const CALORIES_MODEL_FILE: &str = "calories_model.json";

/// Numeric workout columns that go through the scaler, in scaler order.
pub const WORKOUT_SCALED_NAMES: [&str; 4] = ["age", "bmi", "duration_minutes", "calories_burned"];
pub const WORKOUT_SCALED_COLUMNS: usize = WORKOUT_SCALED_NAMES.len();
/// Full workout feature vector width.
pub const WORKOUT_FEATURES: usize = 7;

/// Lifestyle columns ahead of the one-hot gender block, in training order.
pub const LIFESTYLE_BASE_NAMES: [&str; 9] = [
    "age",
    "sleep_hours",
    "recommended_sleep",
    "water_intake_liters",
    "screen_time_hours",
    "sleep_deficit",
    "sleep_ratio",
    "water_deficit",
    "stress_level_encoded",
];
pub const LIFESTYLE_BASE_FEATURES: usize = LIFESTYLE_BASE_NAMES.len();

fn load_json<T: DeserializeOwned>(dir: &Path, file: &str) -> Result<T, ArtifactError> {
    let path: PathBuf = dir.join(file);
    let content =
        std::fs::read_to_string(&path).map_err(|e| ArtifactError::Io(path.clone(), e))?;
    serde_json::from_str(&content).map_err(|e| ArtifactError::Parse(path, e))
}

fn expect_width(what: &'static str, expected: usize, got: usize) -> Result<(), ArtifactError> {
    if expected != got {
        return Err(ArtifactError::DimensionMismatch {
            what,
            expected,
            got,
        });
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkoutEncoders {
    pub gender: LabelEncoder,
    pub activity_level: LabelEncoder,
    pub health_condition: LabelEncoder,
    pub recommended_workout: LabelEncoder,
}

#[derive(Debug, Clone)]
pub struct WorkoutBundle {
    pub model: Network,
    pub scaler: StandardScaler,
    pub encoders: WorkoutEncoders,
}

impl WorkoutBundle {
    pub fn load(dir: &Path) -> Result<Self, ArtifactError> {
        let bundle = Self {
            model: load_json(dir, WORKOUT_MODEL_FILE)?,
            scaler: load_json(dir, WORKOUT_SCALER_FILE)?,
            encoders: load_json(dir, WORKOUT_ENCODERS_FILE)?,
        };
        bundle.validate()?;
        Ok(bundle)
    }

    pub fn validate(&self) -> Result<(), ArtifactError> {
        self.model.validate()?;
        self.scaler.validate()?;
        let enc = &self.encoders;
        enc.gender.validate("gender")?;
        enc.activity_level.validate("activity_level")?;
        enc.health_condition.validate("health_condition")?;
        enc.recommended_workout.validate("recommended_workout")?;
        expect_width("workout scaler", WORKOUT_SCALED_COLUMNS, self.scaler.width())?;
        self.scaler.check_columns("workout scaler", &WORKOUT_SCALED_NAMES)?;
        expect_width("workout model input", WORKOUT_FEATURES, self.model.input_width())?;
        expect_width(
            "workout model output",
            enc.recommended_workout.len(),
            self.model.output_width(),
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LifestyleEncoders {
    pub gender: OneHotEncoder,
    pub stress_level: LabelEncoder,
    pub recommendation: LabelEncoder,
}

#[derive(Debug, Clone)]
pub struct LifestyleBundle {
    pub model: Network,
    pub scaler: StandardScaler,
    pub encoders: LifestyleEncoders,
}

impl LifestyleBundle {
    pub fn load(dir: &Path) -> Result<Self, ArtifactError> {
        let bundle = Self {
            model: load_json(dir, LIFESTYLE_MODEL_FILE)?,
            scaler: load_json(dir, LIFESTYLE_SCALER_FILE)?,
            encoders: load_json(dir, LIFESTYLE_ENCODERS_FILE)?,
        };
        bundle.validate()?;
        Ok(bundle)
    }

    pub fn feature_width(&self) -> usize {
        LIFESTYLE_BASE_FEATURES + self.encoders.gender.width()
    }

    pub fn feature_names(&self) -> Vec<String> {
        LIFESTYLE_BASE_NAMES
            .iter()
            .map(|s| s.to_string())
            .chain(self.encoders.gender.feature_names("gender"))
            .collect()
    }

    pub fn validate(&self) -> Result<(), ArtifactError> {
        self.model.validate()?;
        self.scaler.validate()?;
        let enc = &self.encoders;
        enc.gender.validate("gender")?;
        enc.stress_level.validate("stress_level")?;
        enc.recommendation.validate("recommendation")?;
        expect_width("lifestyle scaler", self.feature_width(), self.scaler.width())?;
        self.scaler.check_columns("lifestyle scaler", &self.feature_names())?;
        expect_width("lifestyle model input", self.feature_width(), self.model.input_width())?;
        expect_width(
            "lifestyle model output",
            enc.recommendation.len(),
            self.model.output_width(),
        )
    }
}

/// One-hot encoders for the categorical meal inputs, applied in
/// declaration order after the numeric `age` column.
#[derive(Debug, Clone, Deserialize)]
pub struct MealFeatureEncoder {
    pub gender: OneHotEncoder,
    pub bmi_status: OneHotEncoder,
    pub goal: OneHotEncoder,
    pub meal_type: OneHotEncoder,
}

impl MealFeatureEncoder {
    pub fn width(&self) -> usize {
        1 + self.gender.width() + self.bmi_status.width() + self.goal.width() + self.meal_type.width()
    }

    pub fn feature_names(&self) -> Vec<String> {
        let mut names = vec!["age".to_string()];
        names.extend(self.gender.feature_names("gender"));
        names.extend(self.bmi_status.feature_names("bmi_status"));
        names.extend(self.goal.feature_names("goal"));
        names.extend(self.meal_type.feature_names("meal_type"));
        names
    }

    fn validate(&self) -> Result<(), ArtifactError> {
        self.gender.validate("gender")?;
        self.bmi_status.validate("bmi_status")?;
        self.goal.validate("goal")?;
        self.meal_type.validate("meal_type")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MealEncoders {
    pub meal_items: LabelEncoder,
}

#[derive(Debug, Clone)]
pub struct MealBundle {
    pub feature_encoder: MealFeatureEncoder,
    pub scaler: StandardScaler,
    pub encoders: MealEncoders,
    pub meal_model: Network,
    pub calories_model: Network,
}

impl MealBundle {
    pub fn load(dir: &Path) -> Result<Self, ArtifactError> {
        let bundle = Self {
            feature_encoder: load_json(dir, MEAL_FEATURE_ENCODER_FILE)?,
            scaler: load_json(dir, MEAL_SCALER_FILE)?,
            encoders: load_json(dir, MEAL_ENCODERS_FILE)?,
            meal_model: load_json(dir, MEAL_ITEMS_MODEL_FILE)?,
            calories_model: load_json(dir, CALORIES_MODEL_FILE)?,
        };
        bundle.validate()?;
        Ok(bundle)
    }

    pub fn validate(&self) -> Result<(), ArtifactError> {
        self.feature_encoder.validate()?;
        self.scaler.validate()?;
        self.encoders.meal_items.validate("meal_items")?;
        self.meal_model.validate()?;
        self.calories_model.validate()?;
        let width = self.feature_encoder.width();
        expect_width("meal scaler", width, self.scaler.width())?;
        self.scaler
            .check_columns("meal scaler", &self.feature_encoder.feature_names())?;
        expect_width("meal model input", width, self.meal_model.input_width())?;
        expect_width(
            "meal model output",
            self.encoders.meal_items.len(),
            self.meal_model.output_width(),
        )?;
        expect_width("calories model input", width, self.calories_model.input_width())?;
        expect_width("calories model output", 1, self.calories_model.output_width())
    }
}

/// Bundles loaded at startup. A domain whose artifacts failed to load is
/// `None`; the other domains are unaffected.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    pub workout: Option<Arc<WorkoutBundle>>,
    pub lifestyle: Option<Arc<LifestyleBundle>>,
    pub meal: Option<Arc<MealBundle>>,
}

impl ModelRegistry {
    pub fn load(dir: &Path) -> Self {
        info!("Loading model artifacts from {}", dir.display());
        Self {
            workout: log_outcome(Domain::Workout, WorkoutBundle::load(dir)),
            lifestyle: log_outcome(Domain::Lifestyle, LifestyleBundle::load(dir)),
            meal: log_outcome(Domain::Meal, MealBundle::load(dir)),
        }
    }

    pub fn is_available(&self, domain: Domain) -> bool {
        match domain {
            Domain::Workout => self.workout.is_some(),
            Domain::Lifestyle => self.lifestyle.is_some(),
            Domain::Meal => self.meal.is_some(),
        }
    }
}

fn log_outcome<T>(domain: Domain, result: Result<T, ArtifactError>) -> Option<Arc<T>> {
    match result {
        Ok(bundle) => {
            info!("{} model loaded successfully", domain.display_name());
            Some(Arc::new(bundle))
        }
        Err(e) => {
            error!("{} model loading failed: {}", domain.display_name(), e);
            None
        }
    }
}
