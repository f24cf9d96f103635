//! Glyph segmentation
//!
//! Splits an ink mask into outermost connected components and normalizes
//! each one into a 28x28 glyph.

pub mod contours;

use crate::models::{BoundingBox, Glyph, GLYPH_SIZE};
use crate::preprocessing::steps::resize;
use image::{imageops, GrayImage};

/// Default minimum glyph side; boxes this thin or thinner are dropped
pub const DEFAULT_MIN_GLYPH_DIM: u32 = 5;

/// Which candidate boxes survive segmentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentationPolicy {
    /// Keep every component, however small (legacy/debug behaviour)
    Unfiltered,
    /// Drop boxes with width <= min_dim or height <= min_dim
    Filtered { min_dim: u32 },
}

impl SegmentationPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unfiltered => "unfiltered",
            Self::Filtered { .. } => "filtered",
        }
    }

    pub fn accepts(&self, bbox: &BoundingBox) -> bool {
        match *self {
            Self::Unfiltered => true,
            Self::Filtered { min_dim } => bbox.width > min_dim && bbox.height > min_dim,
        }
    }
}

impl Default for SegmentationPolicy {
    fn default() -> Self {
        Self::Filtered {
            min_dim: DEFAULT_MIN_GLYPH_DIM,
        }
    }
}

/// A normalized glyph and the mask box it was cut from
#[derive(Debug, Clone)]
pub struct Segment {
    pub glyph: Glyph,
    pub bbox: BoundingBox,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Segmenter {
    policy: SegmentationPolicy,
}

impl Segmenter {
    pub fn new(policy: SegmentationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> SegmentationPolicy {
        self.policy
    }

    /// Segments in contour discovery order; segment i always carries box i
    pub fn segment(&self, mask: &GrayImage) -> Vec<Segment> {
        let boxes = contours::external_boxes(mask);
        let total = boxes.len();

        let segments: Vec<Segment> = boxes
            .into_iter()
            .filter(|bbox| self.policy.accepts(bbox))
            .map(|bbox| Segment {
                glyph: extract_glyph(mask, &bbox),
                bbox,
            })
            .collect();

        tracing::debug!(
            contours = total,
            kept = segments.len(),
            policy = self.policy.as_str(),
            "Segmented mask"
        );
        segments
    }
}

/// Crop `bbox` out of the mask, area-resize to 28x28 and scale to [0, 1]
pub fn extract_glyph(mask: &GrayImage, bbox: &BoundingBox) -> Glyph {
    let crop = imageops::crop_imm(mask, bbox.x, bbox.y, bbox.width, bbox.height).to_image();
    let resized = resize::area(&crop, GLYPH_SIZE, GLYPH_SIZE);
    let pixels = resized.pixels().map(|p| p.0[0] as f32 / 255.0).collect();
    Glyph::from_resized(pixels)
}
