//! Multi-class linear SVM
//!
//! Decision functions are plain hyperplanes `w . x + b`, combined either by
//! one-vs-one voting or by one-vs-rest argmax. Weights are read from a JSON
//! artifact produced by whatever trained the model.

use super::scores::argmax;
use crate::classifier::{check_input, Classifier};
use crate::error::RecognizerError;
use crate::features::FeatureMatrix;
use crate::models::{Label, MAX_DIGIT};
use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// How binary decision functions combine into one label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// One hyperplane per class pair (i, j), i < j, in lexicographic order.
    /// A positive decision votes for i, otherwise for j.
    OneVsOne,
    /// One hyperplane per class; the largest decision wins
    OneVsRest,
}

/// On-disk form of a linear SVM
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearSvmArtifact {
    pub strategy: Strategy,
    pub classes: Vec<u8>,
    pub coef: Vec<Vec<f32>>,
    pub intercept: Vec<f32>,
}

pub struct LinearSvm {
    strategy: Strategy,
    labels: Vec<Label>,
    /// One row per decision function
    weights: Array2<f32>,
    intercept: Array1<f32>,
}

impl LinearSvm {
    pub fn new(
        strategy: Strategy,
        labels: Vec<Label>,
        weights: Array2<f32>,
        intercept: Array1<f32>,
    ) -> Result<Self, RecognizerError> {
        let k = labels.len();
        if k < 2 {
            return Err(RecognizerError::Configuration(format!(
                "linear SVM needs at least 2 classes, got {}",
                k
            )));
        }
        let mut sorted = labels.clone();
        sorted.sort();
        sorted.dedup();
        if sorted.len() != k {
            return Err(RecognizerError::Configuration(
                "linear SVM classes must be unique".to_string(),
            ));
        }
        if let Some(bad) = labels.iter().find(|l| l.0 > MAX_DIGIT) {
            return Err(RecognizerError::Configuration(format!(
                "linear SVM class {} is not a digit",
                bad
            )));
        }

        let expected = match strategy {
            Strategy::OneVsOne => k * (k - 1) / 2,
            Strategy::OneVsRest => k,
        };
        if weights.nrows() != expected || intercept.len() != expected {
            return Err(RecognizerError::Configuration(format!(
                "{:?} over {} classes needs {} decision functions, got {} weight rows and {} intercepts",
                strategy,
                k,
                expected,
                weights.nrows(),
                intercept.len()
            )));
        }
        if weights.ncols() == 0 {
            return Err(RecognizerError::Configuration(
                "linear SVM weights are empty".to_string(),
            ));
        }

        Ok(Self {
            strategy,
            labels,
            weights,
            intercept,
        })
    }

    pub fn from_artifact(artifact: LinearSvmArtifact) -> Result<Self, RecognizerError> {
        let rows = artifact.coef.len();
        let dim = artifact.coef.first().map(Vec::len).unwrap_or(0);
        if artifact.coef.iter().any(|r| r.len() != dim) {
            return Err(RecognizerError::Configuration(
                "linear SVM coefficient rows differ in length".to_string(),
            ));
        }
        let flat: Vec<f32> = artifact.coef.into_iter().flatten().collect();
        let weights = Array2::from_shape_vec((rows, dim), flat).map_err(|e| {
            RecognizerError::Configuration(format!("bad linear SVM coefficients: {}", e))
        })?;
        Self::new(
            artifact.strategy,
            artifact.classes.into_iter().map(Label).collect(),
            weights,
            Array1::from(artifact.intercept),
        )
    }

    pub fn to_artifact(&self) -> LinearSvmArtifact {
        LinearSvmArtifact {
            strategy: self.strategy,
            classes: self.labels.iter().map(|l| l.0).collect(),
            coef: self.weights.rows().into_iter().map(|r| r.to_vec()).collect(),
            intercept: self.intercept.to_vec(),
        }
    }

    /// Load a JSON artifact once at startup
    pub fn load(path: &Path) -> Result<Self, RecognizerError> {
        let raw = fs::read_to_string(path).map_err(|e| {
            RecognizerError::Configuration(format!(
                "cannot read classifier {}: {}",
                path.display(),
                e
            ))
        })?;
        let artifact: LinearSvmArtifact = serde_json::from_str(&raw).map_err(|e| {
            RecognizerError::Configuration(format!(
                "malformed classifier {}: {}",
                path.display(),
                e
            ))
        })?;
        let svm = Self::from_artifact(artifact)?;
        tracing::info!(
            path = %path.display(),
            strategy = ?svm.strategy,
            classes = svm.labels.len(),
            input_dim = svm.weights.ncols(),
            "Loaded linear SVM"
        );
        Ok(svm)
    }

    pub fn save(&self, path: &Path) -> Result<(), RecognizerError> {
        let json = serde_json::to_string(&self.to_artifact()).map_err(|e| {
            RecognizerError::Configuration(format!("cannot encode classifier: {}", e))
        })?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    fn decide(&self, decisions: ArrayView1<'_, f32>) -> Label {
        match self.strategy {
            Strategy::OneVsRest => self.labels[argmax(decisions.iter().copied())],
            Strategy::OneVsOne => {
                let k = self.labels.len();
                let mut votes = vec![0u32; k];
                let mut pair = 0;
                for i in 0..k {
                    for j in (i + 1)..k {
                        if decisions[pair] > 0.0 {
                            votes[i] += 1;
                        } else {
                            votes[j] += 1;
                        }
                        pair += 1;
                    }
                }
                self.labels[argmax(votes.into_iter().map(|v| v as f32))]
            }
        }
    }
}

impl Classifier for LinearSvm {
    fn name(&self) -> &'static str {
        "linear-svm"
    }

    fn input_dim(&self) -> usize {
        self.weights.ncols()
    }

    fn labels(&self) -> &[Label] {
        &self.labels
    }

    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<Label>, RecognizerError> {
        check_input(self, features)?;
        let decisions = features.view().dot(&self.weights.t()) + &self.intercept;
        Ok(decisions.rows().into_iter().map(|row| self.decide(row)).collect())
    }
}
