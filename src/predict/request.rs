use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RequestError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Invalid value for field {0}: {1}")]
    InvalidField(&'static str, String),
}

/// A request body for one prediction domain. Required fields are checked
/// in declaration order before any typed extraction takes place.
pub trait PredictionRequest: Sized {
    const REQUIRED_FIELDS: &'static [&'static str];

    fn extract(fields: &Map<String, Value>) -> Result<Self, RequestError>;

    fn from_fields(fields: &Map<String, Value>) -> Result<Self, RequestError> {
        if let Some(missing) = first_missing(fields, Self::REQUIRED_FIELDS) {
            return Err(RequestError::MissingField(missing));
        }
        Self::extract(fields)
    }
}

pub fn first_missing(fields: &Map<String, Value>, required: &[&'static str]) -> Option<&'static str> {
    required
        .iter()
        .copied()
        .find(|name| matches!(fields.get(*name), None | Some(Value::Null)))
}

/// Numeric field: a JSON number or a string holding one.
fn number(fields: &Map<String, Value>, name: &'static str) -> Result<f64, RequestError> {
    let value = match fields.get(name) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(Value::Null) | None => return Err(RequestError::MissingField(name)),
        Some(_) => None,
    };
    match value {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(RequestError::InvalidField(name, "expected a number".to_string())),
    }
}

/// Categorical field. Numbers and booleans are taken by their textual
/// form so they simply fall through to the encoder's fallback.
fn category(fields: &Map<String, Value>, name: &'static str) -> Result<String, RequestError> {
    match fields.get(name) {
        Some(Value::String(s)) => Ok(s.trim().to_string()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(Value::Null) | None => Err(RequestError::MissingField(name)),
        Some(_) => Err(RequestError::InvalidField(
            name,
            "expected a category string".to_string(),
        )),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutRequest {
    pub age: f64,
    pub gender: String,
    pub bmi: f64,
    pub activity_level: String,
    pub health_condition: String,
    pub duration_minutes: f64,
    pub calories_burned: f64,
}

impl PredictionRequest for WorkoutRequest {
    const REQUIRED_FIELDS: &'static [&'static str] = &[
        "age",
        "gender",
        "bmi",
        "activity_level",
        "health_condition",
        "duration_minutes",
        "calories_burned",
    ];

    fn extract(fields: &Map<String, Value>) -> Result<Self, RequestError> {
        Ok(Self {
            age: number(fields, "age")?,
            gender: category(fields, "gender")?,
            bmi: number(fields, "bmi")?,
            activity_level: category(fields, "activity_level")?,
            health_condition: category(fields, "health_condition")?,
            duration_minutes: number(fields, "duration_minutes")?,
            calories_burned: number(fields, "calories_burned")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LifestyleRequest {
    pub age: f64,
    pub gender: String,
    pub sleep_hours: f64,
    pub recommended_sleep: f64,
    pub water_intake_liters: f64,
    pub stress_level: String,
    pub screen_time_hours: f64,
}

impl PredictionRequest for LifestyleRequest {
    const REQUIRED_FIELDS: &'static [&'static str] = &[
        "age",
        "gender",
        "sleep_hours",
        "recommended_sleep",
        "water_intake_liters",
        "stress_level",
        "screen_time_hours",
    ];

    fn extract(fields: &Map<String, Value>) -> Result<Self, RequestError> {
        Ok(Self {
            age: number(fields, "age")?,
            gender: category(fields, "gender")?,
            sleep_hours: number(fields, "sleep_hours")?,
            recommended_sleep: number(fields, "recommended_sleep")?,
            water_intake_liters: number(fields, "water_intake_liters")?,
            stress_level: category(fields, "stress_level")?,
            screen_time_hours: number(fields, "screen_time_hours")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MealRequest {
    pub age: f64,
    pub gender: String,
    pub bmi_status: String,
    pub goal: String,
    pub meal_type: String,
}

impl PredictionRequest for MealRequest {
    const REQUIRED_FIELDS: &'static [&'static str] =
        &["age", "gender", "bmi_status", "goal", "meal_type"];

    fn extract(fields: &Map<String, Value>) -> Result<Self, RequestError> {
        Ok(Self {
            age: number(fields, "age")?,
            gender: category(fields, "gender")?,
            bmi_status: category(fields, "bmi_status")?,
            goal: category(fields, "goal")?,
            meal_type: category(fields, "meal_type")?,
        })
    }
}
