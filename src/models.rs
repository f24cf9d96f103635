use serde::{Deserialize, Serialize};
use std::fmt;

/// Side length of a normalized glyph patch
pub const GLYPH_SIZE: u32 = 28;

/// Number of values in a flattened glyph
pub const GLYPH_LEN: usize = (GLYPH_SIZE * GLYPH_SIZE) as usize;

/// Largest digit class
pub const MAX_DIGIT: u8 = 9;

/// Axis-aligned rectangle in mask or frame pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build from inclusive min/max corners
    pub fn from_extent(min_x: u32, min_y: u32, max_x: u32, max_y: u32) -> Self {
        Self {
            x: min_x,
            y: min_y,
            width: max_x - min_x + 1,
            height: max_y - min_y + 1,
        }
    }

    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// True if the box is non-empty and lies inside a `width` x `height` image
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.width > 0 && self.height > 0 && self.right() <= width && self.bottom() <= height
    }

    /// Shift the box by an offset, e.g. from ROI-local to frame coordinates
    pub fn translate(&self, dx: u32, dy: u32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

/// A 28x28 patch of intensities in [0, 1], row-major
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pixels: Vec<f32>,
}

impl Glyph {
    /// Returns `None` unless exactly `GLYPH_LEN` values are given
    pub fn from_pixels(pixels: Vec<f32>) -> Option<Self> {
        (pixels.len() == GLYPH_LEN).then_some(Self { pixels })
    }

    /// Caller guarantees `GLYPH_LEN` values
    pub(crate) fn from_resized(pixels: Vec<f32>) -> Self {
        debug_assert_eq!(pixels.len(), GLYPH_LEN);
        Self { pixels }
    }

    pub fn pixels(&self) -> &[f32] {
        &self.pixels
    }

    pub fn get(&self, x: u32, y: u32) -> Option<f32> {
        if x >= GLYPH_SIZE || y >= GLYPH_SIZE {
            return None;
        }
        self.pixels.get((y * GLYPH_SIZE + x) as usize).copied()
    }
}

/// Classifier output: one digit class
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Label(pub u8);

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The ten digit classes
pub fn digit_labels() -> Vec<Label> {
    (0..=MAX_DIGIT).map(Label).collect()
}

/// One positioned label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Detection {
    pub bbox: BoundingBox,
    pub label: Label,
}
