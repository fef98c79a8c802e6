use serde::{Deserialize, Serialize};

use super::ArtifactError;

/// Standardisation with mean and scale fixed at training time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
    #[serde(default)]
    pub feature_names: Vec<String>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Self {
        Self {
            mean,
            scale,
            feature_names: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.mean.len()
    }

    pub fn validate(&self) -> Result<(), ArtifactError> {
        if self.mean.len() != self.scale.len() {
            return Err(ArtifactError::DimensionMismatch {
                what: "scaler scale",
                expected: self.mean.len(),
                got: self.scale.len(),
            });
        }
        if !self.feature_names.is_empty() && self.feature_names.len() != self.mean.len() {
            return Err(ArtifactError::DimensionMismatch {
                what: "scaler feature_names",
                expected: self.mean.len(),
                got: self.feature_names.len(),
            });
        }
        for (i, (&m, &s)) in self.mean.iter().zip(self.scale.iter()).enumerate() {
            if !m.is_finite() || !s.is_finite() || s == 0.0 {
                return Err(ArtifactError::Invalid(format!(
                    "scaler column {} has mean {} and scale {}",
                    i, m, s
                )));
            }
        }
        Ok(())
    }

    /// Check the column names recorded at fit time against the column
    /// order the transformer produces. Scalers exported without names pass.
    pub fn check_columns<S: AsRef<str>>(
        &self,
        what: &'static str,
        expected: &[S],
    ) -> Result<(), ArtifactError> {
        if self.feature_names.is_empty() {
            return Ok(());
        }
        if self.feature_names.len() != expected.len() {
            return Err(ArtifactError::DimensionMismatch {
                what,
                expected: expected.len(),
                got: self.feature_names.len(),
            });
        }
        for (position, (got, want)) in self.feature_names.iter().zip(expected).enumerate() {
            if got != want.as_ref() {
                return Err(ArtifactError::ColumnOrder {
                    what,
                    position,
                    expected: want.as_ref().to_string(),
                    got: got.clone(),
                });
            }
        }
        Ok(())
    }

    /// Scale `values` in place.
    pub fn transform(&self, values: &mut [f64]) -> Result<(), ArtifactError> {
        if values.len() != self.width() {
            return Err(ArtifactError::DimensionMismatch {
                what: "scaler input",
                expected: self.width(),
                got: values.len(),
            });
        }
        for ((v, m), s) in values.iter_mut().zip(&self.mean).zip(&self.scale) {
            *v = (*v - m) / s;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standardize() {
        let scaler = StandardScaler::new(vec![10.0, 0.0], vec![2.0, 0.5]);
        scaler.validate().unwrap();
        let mut v = [14.0, -1.0];
        scaler.transform(&mut v).unwrap();
        assert_eq!(v, [2.0, -2.0]);
    }

    #[test]
    fn test_width_mismatch() {
        let scaler = StandardScaler::new(vec![0.0, 0.0], vec![1.0, 1.0]);
        let mut v = [1.0, 2.0, 3.0];
        assert!(scaler.transform(&mut v).is_err());
    }

    #[test]
    fn test_column_names_must_match() {
        let mut scaler = StandardScaler::new(vec![0.0, 0.0], vec![1.0, 1.0]);
        scaler.check_columns("test scaler", &["a", "b"]).unwrap();

        scaler.feature_names = vec!["a".to_string(), "b".to_string()];
        scaler.check_columns("test scaler", &["a", "b"]).unwrap();

        let err = scaler.check_columns("test scaler", &["b", "a"]).unwrap_err();
        match err {
            ArtifactError::ColumnOrder { position, expected, got, .. } => {
                assert_eq!(position, 0);
                assert_eq!(expected, "b");
                assert_eq!(got, "a");
            }
            other => panic!("unexpected error: {}", other),
        }
        assert!(scaler.check_columns("test scaler", &["a"]).is_err());
    }

    #[test]
    fn test_zero_scale_rejected() {
        let scaler = StandardScaler::new(vec![0.0], vec![0.0]);
        assert!(scaler.validate().is_err());
        let scaler = StandardScaler::new(vec![0.0], vec![1.0, 2.0]);
        assert!(scaler.validate().is_err());
    }
}
