use super::FeatureMatrix;
use crate::error::RecognizerError;
use ndarray::Array2;

/// Fixed principal directions, stored as an `input_dim x components` matrix
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionBasis {
    components: Array2<f32>,
}

impl ProjectionBasis {
    pub fn new(components: Array2<f32>) -> Result<Self, RecognizerError> {
        if components.is_empty() {
            return Err(RecognizerError::Configuration(
                "projection basis is empty".to_string(),
            ));
        }
        if components.iter().any(|v| !v.is_finite()) {
            return Err(RecognizerError::Configuration(
                "projection basis contains non-finite values".to_string(),
            ));
        }
        Ok(Self { components })
    }

    /// One inner vec per input dimension, each holding `components` weights
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self, RecognizerError> {
        let input_dim = rows.len();
        let output_dim = rows.first().map(Vec::len).unwrap_or(0);
        if let Some(bad) = rows.iter().position(|r| r.len() != output_dim) {
            return Err(RecognizerError::Configuration(format!(
                "projection basis row {} has {} values, expected {}",
                bad,
                rows[bad].len(),
                output_dim
            )));
        }
        let flat: Vec<f32> = rows.into_iter().flatten().collect();
        let components = Array2::from_shape_vec((input_dim, output_dim), flat)
            .map_err(|e| RecognizerError::Configuration(format!("bad projection basis: {}", e)))?;
        Self::new(components)
    }

    pub fn to_rows(&self) -> Vec<Vec<f32>> {
        self.components.rows().into_iter().map(|r| r.to_vec()).collect()
    }

    pub fn input_dim(&self) -> usize {
        self.components.nrows()
    }

    pub fn output_dim(&self) -> usize {
        self.components.ncols()
    }

    pub fn project(&self, features: &FeatureMatrix) -> Result<FeatureMatrix, RecognizerError> {
        if features.cols() != self.input_dim() {
            return Err(RecognizerError::Configuration(format!(
                "projection basis expects {} features, got {}",
                self.input_dim(),
                features.cols()
            )));
        }
        Ok(FeatureMatrix::new(features.view().dot(&self.components)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_project_multiplies_by_basis() {
        let basis = ProjectionBasis::from_rows(vec![vec![1.0, 0.0], vec![0.0, 2.0], vec![1.0, 1.0]])
            .unwrap();
        let features = FeatureMatrix::new(array![[1.0, 2.0, 3.0], [0.0, 0.0, 1.0]]);

        let projected = basis.project(&features).unwrap();

        assert_eq!(projected.view(), array![[4.0, 7.0], [1.0, 1.0]]);
    }

    #[test]
    fn test_ragged_rows_are_rejected() {
        let err = ProjectionBasis::from_rows(vec![vec![1.0, 0.0], vec![1.0]]).unwrap_err();
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn test_project_rejects_wrong_width() {
        let basis = ProjectionBasis::from_rows(vec![vec![1.0]; 4]).unwrap();
        let features = FeatureMatrix::new(array![[1.0, 2.0]]);
        assert!(basis.project(&features).is_err());
    }
}
