//! Handwritten digit recognition on camera-style frames.
//!
//! A frame is thresholded into an ink mask, split into connected glyphs,
//! optionally standardized and projected, and classified in one batch.

pub mod capture;
pub mod classifier;
pub mod classifiers;
pub mod config;
pub mod error;
pub mod features;
pub mod models;
pub mod pipeline;
pub mod preprocessing;
pub mod render;
pub mod runner;
pub mod segmentation;

pub use classifier::Classifier;
pub use config::{Config, PipelineConfig};
pub use error::RecognizerError;
pub use features::{FeatureMatrix, FeatureTransformer, NormalizationOrder};
pub use models::{BoundingBox, Detection, Glyph, Label, GLYPH_LEN, GLYPH_SIZE};
pub use pipeline::{DigitPipeline, FrameReport};
pub use segmentation::{Segment, SegmentationPolicy, Segmenter};
