use super::FeatureMatrix;
use crate::error::RecognizerError;
use ndarray::{Array1, Axis};

/// Per-dimension standardization with statistics fixed at training time
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    mean: Array1<f32>,
    scale: Array1<f32>,
}

impl StandardScaler {
    /// Build from persisted statistics. A zero scale marks a constant
    /// feature and is replaced by 1 so it maps to 0 instead of NaN.
    pub fn new(mean: Vec<f32>, scale: Vec<f32>) -> Result<Self, RecognizerError> {
        if mean.is_empty() {
            return Err(RecognizerError::Configuration(
                "scaler statistics are empty".to_string(),
            ));
        }
        if mean.len() != scale.len() {
            return Err(RecognizerError::Configuration(format!(
                "scaler mean has {} values but scale has {}",
                mean.len(),
                scale.len()
            )));
        }
        if mean.iter().chain(scale.iter()).any(|v| !v.is_finite()) {
            return Err(RecognizerError::Configuration(
                "scaler statistics contain non-finite values".to_string(),
            ));
        }

        let scale = scale
            .into_iter()
            .map(|s| if s == 0.0 { 1.0 } else { s })
            .collect::<Array1<f32>>();
        Ok(Self {
            mean: Array1::from(mean),
            scale,
        })
    }

    /// Fit mean and population standard deviation per column
    pub fn fit(samples: &FeatureMatrix) -> Result<Self, RecognizerError> {
        let data = samples.view();
        let mean = data.mean_axis(Axis(0)).ok_or_else(|| {
            RecognizerError::Configuration("cannot fit a scaler on zero samples".to_string())
        })?;
        let scale = data.std_axis(Axis(0), 0.0);
        Self::new(mean.to_vec(), scale.to_vec())
    }

    pub fn dim(&self) -> usize {
        self.mean.len()
    }

    pub fn mean(&self) -> &[f32] {
        self.mean.as_slice().unwrap_or(&[])
    }

    pub fn scale(&self) -> &[f32] {
        self.scale.as_slice().unwrap_or(&[])
    }

    pub fn transform(&self, features: &FeatureMatrix) -> Result<FeatureMatrix, RecognizerError> {
        if features.cols() != self.dim() {
            return Err(RecognizerError::Configuration(format!(
                "scaler expects {} features, got {}",
                self.dim(),
                features.cols()
            )));
        }
        let standardized = (&features.view() - &self.mean) / &self.scale;
        Ok(FeatureMatrix::new(standardized))
    }
}
