use crate::error::RecognizerError;
use image::{GrayImage, RgbImage};
use serde::Serialize;
use std::time::Instant;

use super::steps;

/// Timing information for a single processing step
#[derive(Debug, Clone, Serialize)]
pub struct StepTiming {
    pub name: String,
    pub time_ms: u64,
}

/// Result of preprocessing including timing stats
#[derive(Debug, Clone, Serialize)]
pub struct PreprocessingResult {
    /// Binary mask, 255 = ink (not serialized)
    #[serde(skip)]
    pub mask: GrayImage,
    /// Total preprocessing time in milliseconds
    pub total_time_ms: u64,
    /// Individual step timings
    pub steps: Vec<StepTiming>,
}

/// Grayscale conversion followed by an inverted global threshold
#[derive(Debug, Clone, Copy)]
pub struct Preprocessor {
    threshold: u8,
}

impl Preprocessor {
    pub fn new(threshold: u8) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Produce the ink mask for a frame or ROI
    pub fn preprocess(&self, image: &RgbImage) -> Result<GrayImage, RecognizerError> {
        Ok(self.process(image)?.mask)
    }

    /// Same as [`Preprocessor::preprocess`], keeping per-step timings
    pub fn process(&self, image: &RgbImage) -> Result<PreprocessingResult, RecognizerError> {
        let start = Instant::now();
        let mut steps_timing = Vec::new();

        let gray = run_step("grayscale", &mut steps_timing, || {
            steps::grayscale::apply(image)
        })?;
        let threshold = self.threshold;
        let mask = run_step("threshold", &mut steps_timing, || {
            Ok(steps::threshold::apply(&gray, threshold))
        })?;

        Ok(PreprocessingResult {
            mask,
            total_time_ms: start.elapsed().as_millis() as u64,
            steps: steps_timing,
        })
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new(steps::threshold::DEFAULT_THRESHOLD)
    }
}

/// Run one named step and record how long it took
pub(crate) fn run_step<T, F>(
    name: &str,
    timings: &mut Vec<StepTiming>,
    step_fn: F,
) -> Result<T, RecognizerError>
where
    F: FnOnce() -> Result<T, RecognizerError>,
{
    let step_start = Instant::now();
    let result = step_fn()?;
    timings.push(StepTiming {
        name: name.to_string(),
        time_ms: step_start.elapsed().as_millis() as u64,
    });
    Ok(result)
}
