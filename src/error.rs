use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecognizerError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Classification failed: {0}")]
    Classification(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Machine-readable error record, emitted by the runner for skipped frames
#[derive(Serialize)]
pub struct ErrorReport {
    pub error: String,
    pub code: String,
}

impl RecognizerError {
    /// Stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            RecognizerError::InvalidInput(_) => "INVALID_INPUT",
            RecognizerError::Configuration(_) => "CONFIGURATION_ERROR",
            RecognizerError::Classification(_) => "CLASSIFICATION_ERROR",
            RecognizerError::Io(_) => "IO_ERROR",
            RecognizerError::Image(_) => "IMAGE_ERROR",
        }
    }

    /// Configuration problems must stop the process; everything else only
    /// invalidates the current frame.
    pub fn is_fatal(&self) -> bool {
        matches!(self, RecognizerError::Configuration(_))
    }

    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            error: self.to_string(),
            code: self.code().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_configuration_errors_are_fatal() {
        assert!(RecognizerError::Configuration("bad stats".into()).is_fatal());
        assert!(!RecognizerError::InvalidInput("empty frame".into()).is_fatal());
        assert!(!RecognizerError::Classification("oops".into()).is_fatal());
    }

    #[test]
    fn test_report_carries_code_and_message() {
        let report = RecognizerError::InvalidInput("frame has zero width".into()).report();
        assert_eq!(report.code, "INVALID_INPUT");
        assert!(report.error.contains("zero width"));
    }
}
