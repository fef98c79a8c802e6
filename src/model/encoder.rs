use serde::{Deserialize, Serialize};

use super::ArtifactError;

/// Fitted mapping between a fixed vocabulary of category strings and
/// integer codes. Codes are positions in `classes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelEncoder {
    pub classes: Vec<String>,
}

impl LabelEncoder {
    pub fn new<S: Into<String>>(classes: impl IntoIterator<Item = S>) -> Self {
        Self {
            classes: classes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn validate(&self, name: &str) -> Result<(), ArtifactError> {
        if self.is_empty() {
            return Err(ArtifactError::Invalid(format!(
                "encoder {} has an empty vocabulary",
                name
            )));
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn contains(&self, value: &str) -> bool {
        self.classes.iter().any(|c| c == value)
    }

    pub fn transform(&self, value: &str) -> Option<usize> {
        self.classes.iter().position(|c| c == value)
    }

    /// Encode `value`, substituting `fallback` for anything outside the
    /// vocabulary. If the fallback is unknown as well, code 0 is used.
    pub fn transform_or(&self, value: &str, fallback: &str) -> usize {
        self.transform(value)
            .or_else(|| self.transform(fallback))
            .unwrap_or(0)
    }

    /// Encode `value`, falling back to the first fitted class.
    pub fn transform_or_first(&self, value: &str) -> usize {
        self.transform(value).unwrap_or(0)
    }

    pub fn inverse_transform(&self, code: usize) -> Result<&str, ArtifactError> {
        self.classes
            .get(code)
            .map(|s| s.as_str())
            .ok_or(ArtifactError::UnknownCode {
                code,
                classes: self.classes.len(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropPolicy {
    First,
}

/// One-hot encoder over a fitted category list. Unknown values are
/// encoded as the first category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneHotEncoder {
    pub categories: Vec<String>,
    #[serde(default)]
    pub drop: Option<DropPolicy>,
}

impl OneHotEncoder {
    pub fn new<S: Into<String>>(categories: impl IntoIterator<Item = S>) -> Self {
        Self {
            categories: categories.into_iter().map(Into::into).collect(),
            drop: None,
        }
    }

    pub fn validate(&self, name: &str) -> Result<(), ArtifactError> {
        if self.categories.is_empty() {
            return Err(ArtifactError::Invalid(format!(
                "one-hot encoder {} has no categories",
                name
            )));
        }
        if self.drop == Some(DropPolicy::First) && self.categories.len() < 2 {
            return Err(ArtifactError::Invalid(format!(
                "one-hot encoder {} drops its only category",
                name
            )));
        }
        Ok(())
    }

    fn skip(&self) -> usize {
        match self.drop {
            Some(DropPolicy::First) => 1,
            None => 0,
        }
    }

    /// Number of columns this encoder emits.
    pub fn width(&self) -> usize {
        self.categories.len() - self.skip()
    }

    pub fn feature_names(&self, field: &str) -> Vec<String> {
        self.categories
            .iter()
            .skip(self.skip())
            .map(|c| format!("{}_{}", field, c))
            .collect()
    }

    /// Append the encoded columns for `value` to `out`.
    pub fn encode_into(&self, value: &str, out: &mut Vec<f64>) {
        let hot = self
            .categories
            .iter()
            .position(|c| c == value)
            .unwrap_or(0);
        for i in self.skip()..self.categories.len() {
            out.push(if i == hot { 1.0 } else { 0.0 });
        }
    }
}
