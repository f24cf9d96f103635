//! Frame preprocessing
//!
//! Turns a color frame (or a region of it) into a binary ink mask.

pub mod pipeline;
pub mod steps;

pub use pipeline::{Preprocessor, PreprocessingResult, StepTiming};
