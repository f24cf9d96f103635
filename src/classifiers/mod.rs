//! Classifier implementations
//!
//! This module contains implementations of the Classifier trait. The network
//! backend is conditionally compiled behind the `network` feature flag.

pub mod linear;
mod scores;

#[cfg(feature = "network")]
pub mod network;

use crate::classifier::Classifier;
use crate::error::RecognizerError;
use std::path::Path;
use std::sync::Arc;

/// Information about a loaded classifier
#[derive(Debug, Clone, serde::Serialize)]
pub struct ClassifierInfo {
    pub name: &'static str,
    pub input_dim: usize,
    pub labels: Vec<u8>,
}

impl ClassifierInfo {
    pub fn of(classifier: &dyn Classifier) -> Self {
        Self {
            name: classifier.name(),
            input_dim: classifier.input_dim(),
            labels: classifier.labels().iter().map(|l| l.0).collect(),
        }
    }
}

/// Load a classifier artifact, picking the backend from the file extension
pub fn load_classifier(
    path: &Path,
    channels_last: bool,
) -> Result<Arc<dyn Classifier>, RecognizerError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "json" => {
            tracing::info!("Initializing linear SVM classifier...");
            Ok(Arc::new(linear::LinearSvm::load(path)?))
        }
        #[cfg(feature = "network")]
        "rten" => {
            tracing::info!("Initializing network classifier...");
            Ok(Arc::new(network::NetworkClassifier::load(path, channels_last)?))
        }
        #[cfg(not(feature = "network"))]
        "rten" => {
            let _ = channels_last;
            Err(RecognizerError::Configuration(
                "Network classifiers need a build with --features network".to_string(),
            ))
        }
        other => Err(RecognizerError::Configuration(format!(
            "Unsupported classifier artifact '{}' (extension '{}')",
            path.display(),
            other
        ))),
    }
}
