use image::{GrayImage, Luma};

/// Default global threshold separating ink from paper
pub const DEFAULT_THRESHOLD: u8 = 128;

/// Foreground value in a binary mask
pub const FOREGROUND: u8 = 255;

/// Fixed global threshold with inverted polarity.
///
/// Pixels brighter than `threshold` become background (0); everything else
/// becomes foreground (255), so dark ink on a light page ends up high.
pub fn apply(gray: &GrayImage, threshold: u8) -> GrayImage {
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        if gray.get_pixel(x, y).0[0] > threshold {
            Luma([0u8])
        } else {
            Luma([FOREGROUND])
        }
    })
}
