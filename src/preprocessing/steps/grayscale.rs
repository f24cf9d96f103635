use crate::error::RecognizerError;
use image::{GrayImage, Luma, RgbImage};

/// Convert a color frame to single-channel luma using BT.601 weights
/// (Y = 0.299 R + 0.587 G + 0.114 B), rounded to nearest.
pub fn apply(image: &RgbImage) -> Result<GrayImage, RecognizerError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(RecognizerError::InvalidInput(format!(
            "cannot convert a {}x{} image to grayscale",
            width, height
        )));
    }

    Ok(GrayImage::from_fn(width, height, |x, y| {
        let [r, g, b] = image.get_pixel(x, y).0;
        Luma([luma(r, g, b)])
    }))
}

/// Fixed-point BT.601 luma (weights scaled by 2^14)
fn luma(r: u8, g: u8, b: u8) -> u8 {
    const R: u32 = 4899;
    const G: u32 = 9617;
    const B: u32 = 1868;
    let y = (R * r as u32 + G * g as u32 + B * b as u32 + (1 << 13)) >> 14;
    y.min(255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_grayscale_uses_luma_weights() {
        let mut img = RgbImage::new(4, 1);
        img.put_pixel(0, 0, Rgb([255, 0, 0])); // Red
        img.put_pixel(1, 0, Rgb([0, 255, 0])); // Green
        img.put_pixel(2, 0, Rgb([0, 0, 255])); // Blue
        img.put_pixel(3, 0, Rgb([255, 255, 255]));

        let gray = apply(&img).unwrap();

        assert_eq!(gray.get_pixel(0, 0).0[0], 76);
        assert_eq!(gray.get_pixel(1, 0).0[0], 150);
        assert_eq!(gray.get_pixel(2, 0).0[0], 29);
        assert_eq!(gray.get_pixel(3, 0).0[0], 255);
    }

    #[test]
    fn test_grayscale_preserves_dimensions() {
        let img = RgbImage::new(100, 50);
        let result = apply(&img).unwrap();
        assert_eq!(result.width(), 100);
        assert_eq!(result.height(), 50);
    }

    #[test]
    fn test_grayscale_rejects_empty_image() {
        let img = RgbImage::new(0, 10);
        assert!(matches!(apply(&img), Err(RecognizerError::InvalidInput(_))));
    }
}
