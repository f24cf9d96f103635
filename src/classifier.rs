use crate::error::RecognizerError;
use crate::features::FeatureMatrix;
use crate::models::Label;

/// Trait that all digit classifiers must implement
pub trait Classifier: Send + Sync {
    /// Returns the classifier identifier (e.g., "linear-svm", "network")
    fn name(&self) -> &'static str;

    /// Number of features each input row must carry
    fn input_dim(&self) -> usize;

    /// Labels this classifier can emit
    fn labels(&self) -> &[Label];

    /// Classify a batch; returns exactly one label per row, in row order
    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<Label>, RecognizerError>;
}

/// Reject batches whose width does not match the classifier
pub(crate) fn check_input(
    classifier: &dyn Classifier,
    features: &FeatureMatrix,
) -> Result<(), RecognizerError> {
    if features.cols() != classifier.input_dim() {
        return Err(RecognizerError::Configuration(format!(
            "{} classifier expects {} features, got {}",
            classifier.name(),
            classifier.input_dim(),
            features.cols()
        )));
    }
    Ok(())
}
