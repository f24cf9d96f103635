use crate::preprocessing::steps::threshold::DEFAULT_THRESHOLD;
use crate::segmentation::SegmentationPolicy;
use std::path::PathBuf;

/// Per-frame pipeline settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Global gray level; brighter pixels are background
    pub threshold: u8,
    pub policy: SegmentationPolicy,
    /// Side of a centered square region of interest; `None` uses the full frame
    pub roi_size: Option<u32>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            policy: SegmentationPolicy::default(),
            roi_size: None,
        }
    }
}

/// Runner configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub classifier_path: PathBuf,
    pub stats_path: Option<PathBuf>,
    /// Feed network classifiers `[N, 28, 28, 1]` instead of `[N, 1, 28, 28]`
    pub channels_last: bool,
    pub inputs: Vec<PathBuf>,
    pub annotate_dir: Option<PathBuf>,
    pub pipeline: PipelineConfig,
}
