//! Neural network classifier
//!
//! Runs a pretrained digit network exported to the `.rten` format. The model
//! takes a `[N, 1, 28, 28]` (or channels-last `[N, 28, 28, 1]`) batch of
//! glyph intensities and returns one score per digit class.

use super::scores::{best_labels, glyph_batch_shape};
use crate::classifier::{check_input, Classifier};
use crate::error::RecognizerError;
use crate::features::FeatureMatrix;
use crate::models::{digit_labels, Label, GLYPH_LEN};
use rten::Model;
use rten_tensor::prelude::*;
use rten_tensor::NdTensor;
use std::path::Path;

pub struct NetworkClassifier {
    model: Model,
    labels: Vec<Label>,
    channels_last: bool,
}

impl NetworkClassifier {
    pub fn load(path: &Path, channels_last: bool) -> Result<Self, RecognizerError> {
        tracing::info!("Loading digit network from {}...", path.display());

        let model = Model::load_file(path).map_err(|e| {
            RecognizerError::Configuration(format!(
                "Failed to load network {}: {}",
                path.display(),
                e
            ))
        })?;

        tracing::info!("Digit network loaded successfully");

        Ok(Self {
            model,
            labels: digit_labels(),
            channels_last,
        })
    }
}

impl Classifier for NetworkClassifier {
    fn name(&self) -> &'static str {
        "network"
    }

    fn input_dim(&self) -> usize {
        GLYPH_LEN
    }

    fn labels(&self) -> &[Label] {
        &self.labels
    }

    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<Label>, RecognizerError> {
        check_input(self, features)?;
        let batch = features.rows();
        let data: Vec<f32> = features.view().iter().copied().collect();
        let input = NdTensor::from_data(glyph_batch_shape(batch, self.channels_last), data);

        let output: NdTensor<f32, 2> = self
            .model
            .run_one(input.view().into(), None)
            .map_err(|e| RecognizerError::Classification(format!("Inference failed: {}", e)))?
            .try_into()
            .map_err(|e| {
                RecognizerError::Classification(format!("Unexpected network output: {:?}", e))
            })?;

        let classes = output.size(1);
        if output.size(0) != batch || classes != self.labels.len() {
            return Err(RecognizerError::Classification(format!(
                "network returned {}x{} scores for a batch of {}",
                output.size(0),
                classes,
                batch
            )));
        }

        Ok(best_labels(&output.to_vec(), &self.labels))
    }
}
