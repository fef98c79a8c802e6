use serde::{Deserialize, Serialize};

use super::ArtifactError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Linear,
    Relu,
    Sigmoid,
    Tanh,
    Softmax,
}

impl Activation {
    fn apply(self, values: &mut [f64]) {
        match self {
            Activation::Linear => {}
            Activation::Relu => values.iter_mut().for_each(|v| *v = v.max(0.0)),
            Activation::Sigmoid => values.iter_mut().for_each(|v| *v = sigmoid(*v)),
            Activation::Tanh => values.iter_mut().for_each(|v| *v = v.tanh()),
            Activation::Softmax => softmax(values),
        }
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let ez = z.exp();
        ez / (1.0 + ez)
    }
}

pub fn softmax(values: &mut [f64]) {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut sum = 0.0;
    for v in values.iter_mut() {
        *v = (*v - max).exp();
        sum += *v;
    }
    if sum > 0.0 {
        values.iter_mut().for_each(|v| *v /= sum);
    }
}

/// A fully connected layer. `weights` is input-major: one row per input,
/// one column per unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseLayer {
    pub weights: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
    pub activation: Activation,
}

impl DenseLayer {
    pub fn inputs(&self) -> usize {
        self.weights.len()
    }

    pub fn units(&self) -> usize {
        self.bias.len()
    }

    fn forward(&self, input: &[f64]) -> Vec<f64> {
        let mut out = self.bias.clone();
        for (x, row) in input.iter().zip(&self.weights) {
            for (o, w) in out.iter_mut().zip(row) {
                *o += x * w;
            }
        }
        self.activation.apply(&mut out);
        out
    }
}

/// Sequential dense network exported from training as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Network {
    #[serde(default)]
    pub name: String,
    pub layers: Vec<DenseLayer>,
}

impl Network {
    pub fn input_width(&self) -> usize {
        self.layers.first().map(|l| l.inputs()).unwrap_or(0)
    }

    pub fn output_width(&self) -> usize {
        self.layers.last().map(|l| l.units()).unwrap_or(0)
    }

    pub fn validate(&self) -> Result<(), ArtifactError> {
        if self.layers.is_empty() {
            return Err(ArtifactError::Invalid(format!(
                "network {} has no layers",
                self.name
            )));
        }
        let mut expected_inputs = self.input_width();
        for (idx, layer) in self.layers.iter().enumerate() {
            if layer.inputs() == 0 || layer.units() == 0 {
                return Err(ArtifactError::Invalid(format!(
                    "layer {} of network {} is empty",
                    idx, self.name
                )));
            }
            if layer.inputs() != expected_inputs {
                return Err(ArtifactError::DimensionMismatch {
                    what: "layer inputs",
                    expected: expected_inputs,
                    got: layer.inputs(),
                });
            }
            for row in &layer.weights {
                if row.len() != layer.units() {
                    return Err(ArtifactError::DimensionMismatch {
                        what: "weight row",
                        expected: layer.units(),
                        got: row.len(),
                    });
                }
                if let Some(w) = row.iter().find(|w| !w.is_finite()) {
                    return Err(ArtifactError::Invalid(format!(
                        "layer {} has non-finite weight {}",
                        idx, w
                    )));
                }
            }
            if let Some(b) = layer.bias.iter().find(|b| !b.is_finite()) {
                return Err(ArtifactError::Invalid(format!(
                    "layer {} has non-finite bias {}",
                    idx, b
                )));
            }
            expected_inputs = layer.units();
        }
        Ok(())
    }

    /// Run a forward pass over a single sample.
    pub fn predict(&self, input: &[f64]) -> Result<Vec<f64>, ArtifactError> {
        if input.len() != self.input_width() {
            return Err(ArtifactError::DimensionMismatch {
                what: "network input",
                expected: self.input_width(),
                got: input.len(),
            });
        }
        let mut values = input.to_vec();
        for layer in &self.layers {
            values = layer.forward(&values);
        }
        Ok(values)
    }

    /// Forward pass for a single-output regressor.
    pub fn predict_scalar(&self, input: &[f64]) -> Result<f64, ArtifactError> {
        let out = self.predict(input)?;
        out.first().copied().ok_or_else(|| {
            ArtifactError::Invalid(format!("network {} produced no output", self.name))
        })
    }
}
