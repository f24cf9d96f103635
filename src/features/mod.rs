//! Feature extraction for the classical classifier path
//!
//! Flattened glyphs are standardized and projected onto a fixed principal
//! basis. The two orders in which that can happen are not interchangeable,
//! so the order travels with the statistics: the same [`FeatureTransformer`]
//! fits the scaler at training time and applies it at inference time.

pub mod projection;
pub mod scaler;

pub use projection::ProjectionBasis;
pub use scaler::StandardScaler;

use crate::error::RecognizerError;
use crate::models::{Glyph, GLYPH_LEN};
use ndarray::{Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// N feature vectors of D dimensions, passed to a classifier as one batch
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix(Array2<f32>);

impl FeatureMatrix {
    pub fn new(data: Array2<f32>) -> Self {
        Self(data)
    }

    /// One row per glyph, each the row-major flattened patch
    pub fn from_glyphs(glyphs: &[&Glyph]) -> Self {
        Self(Array2::from_shape_fn((glyphs.len(), GLYPH_LEN), |(r, c)| {
            glyphs[r].pixels()[c]
        }))
    }

    pub fn rows(&self) -> usize {
        self.0.nrows()
    }

    pub fn cols(&self) -> usize {
        self.0.ncols()
    }

    pub fn row(&self, index: usize) -> ArrayView1<'_, f32> {
        self.0.row(index)
    }

    pub fn view(&self) -> ArrayView2<'_, f32> {
        self.0.view()
    }
}

/// When standardization happens relative to projection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizationOrder {
    /// Scaler statistics live in glyph space; project afterwards
    StandardizeThenProject,
    /// Project first; scaler statistics live in the reduced space
    ProjectThenStandardize,
}

/// On-disk form of the normalization statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizationStats {
    pub order: NormalizationOrder,
    pub mean: Vec<f32>,
    pub scale: Vec<f32>,
    /// `input_dim` rows of `components` weights; absent for scaler-only models
    #[serde(default)]
    pub basis: Option<Vec<Vec<f32>>>,
}

impl NormalizationStats {
    pub fn load(path: &Path) -> Result<Self, RecognizerError> {
        let raw = fs::read_to_string(path).map_err(|e| {
            RecognizerError::Configuration(format!(
                "cannot read normalization statistics {}: {}",
                path.display(),
                e
            ))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            RecognizerError::Configuration(format!(
                "malformed normalization statistics {}: {}",
                path.display(),
                e
            ))
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), RecognizerError> {
        let json = serde_json::to_string(self).map_err(|e| {
            RecognizerError::Configuration(format!("cannot encode statistics: {}", e))
        })?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Standardization plus optional projection, in a fixed order
#[derive(Debug, Clone)]
pub struct FeatureTransformer {
    order: NormalizationOrder,
    scaler: StandardScaler,
    basis: Option<ProjectionBasis>,
}

impl FeatureTransformer {
    pub fn new(
        order: NormalizationOrder,
        scaler: StandardScaler,
        basis: Option<ProjectionBasis>,
    ) -> Result<Self, RecognizerError> {
        if let Some(basis) = &basis {
            let (expected, space) = match order {
                NormalizationOrder::StandardizeThenProject => (basis.input_dim(), "input"),
                NormalizationOrder::ProjectThenStandardize => (basis.output_dim(), "projected"),
            };
            if scaler.dim() != expected {
                return Err(RecognizerError::Configuration(format!(
                    "scaler has {} dimensions but the {} space has {}",
                    scaler.dim(),
                    space,
                    expected
                )));
            }
        }
        Ok(Self {
            order,
            scaler,
            basis,
        })
    }

    /// Fit the scaler on training samples in the space `order` calls for
    pub fn fit(
        order: NormalizationOrder,
        basis: Option<ProjectionBasis>,
        samples: &FeatureMatrix,
    ) -> Result<Self, RecognizerError> {
        let scaler = match (&basis, order) {
            (Some(basis), NormalizationOrder::ProjectThenStandardize) => {
                StandardScaler::fit(&basis.project(samples)?)?
            }
            _ => StandardScaler::fit(samples)?,
        };
        Self::new(order, scaler, basis)
    }

    pub fn from_stats(stats: NormalizationStats) -> Result<Self, RecognizerError> {
        let scaler = StandardScaler::new(stats.mean, stats.scale)?;
        let basis = stats.basis.map(ProjectionBasis::from_rows).transpose()?;
        Self::new(stats.order, scaler, basis)
    }

    pub fn to_stats(&self) -> NormalizationStats {
        NormalizationStats {
            order: self.order,
            mean: self.scaler.mean().to_vec(),
            scale: self.scaler.scale().to_vec(),
            basis: self.basis.as_ref().map(ProjectionBasis::to_rows),
        }
    }

    /// Load statistics once at startup
    pub fn load(path: &Path) -> Result<Self, RecognizerError> {
        let transformer = Self::from_stats(NormalizationStats::load(path)?)?;
        tracing::info!(
            path = %path.display(),
            order = ?transformer.order,
            input_dim = transformer.input_dim(),
            output_dim = transformer.output_dim(),
            "Loaded normalization statistics"
        );
        Ok(transformer)
    }

    pub fn order(&self) -> NormalizationOrder {
        self.order
    }

    pub fn input_dim(&self) -> usize {
        match &self.basis {
            Some(basis) => basis.input_dim(),
            None => self.scaler.dim(),
        }
    }

    pub fn output_dim(&self) -> usize {
        match &self.basis {
            Some(basis) => basis.output_dim(),
            None => self.scaler.dim(),
        }
    }

    pub fn transform(&self, features: &FeatureMatrix) -> Result<FeatureMatrix, RecognizerError> {
        let Some(basis) = &self.basis else {
            return self.scaler.transform(features);
        };
        match self.order {
            NormalizationOrder::StandardizeThenProject => {
                basis.project(&self.scaler.transform(features)?)
            }
            NormalizationOrder::ProjectThenStandardize => {
                self.scaler.transform(&basis.project(features)?)
            }
        }
    }

    pub fn transform_glyphs(&self, glyphs: &[&Glyph]) -> Result<FeatureMatrix, RecognizerError> {
        self.transform(&FeatureMatrix::from_glyphs(glyphs))
    }
}
