pub mod encoder;
pub mod network;
pub mod scaler;
pub mod store;

pub use encoder::{DropPolicy, LabelEncoder, OneHotEncoder};
pub use network::{Activation, DenseLayer, Network};
pub use scaler::StandardScaler;
pub use store::*;

use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    Workout,
    Lifestyle,
    Meal,
}

impl Domain {
    pub const ALL: [Domain; 3] = [Domain::Workout, Domain::Lifestyle, Domain::Meal];

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Workout => "workout",
            Domain::Lifestyle => "lifestyle",
            Domain::Meal => "meal",
        }
    }

    /// Name used in user-facing messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            Domain::Workout => "Workout",
            Domain::Lifestyle => "Lifestyle",
            Domain::Meal => "Meal plan",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("failed to read {0}: {1}")]
    Io(PathBuf, std::io::Error),
    #[error("failed to parse {0}: {1}")]
    Parse(PathBuf, serde_json::Error),
    #[error("invalid artifact: {0}")]
    Invalid(String),
    #[error("{what} dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("{what} column {position} is {got:?}, expected {expected:?}")]
    ColumnOrder {
        what: &'static str,
        position: usize,
        expected: String,
        got: String,
    },
    #[error("class index {code} out of range for {classes} classes")]
    UnknownCode { code: usize, classes: usize },
}
