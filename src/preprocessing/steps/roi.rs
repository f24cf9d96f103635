use crate::error::RecognizerError;
use crate::models::BoundingBox;
use image::{imageops, RgbImage};

/// Centered square region of interest, clamped to the frame
pub fn centered(width: u32, height: u32, size: u32) -> BoundingBox {
    let side = size.min(width).min(height);
    BoundingBox::new((width - side) / 2, (height - side) / 2, side, side)
}

/// Crop `region` out of `image`
pub fn apply(image: &RgbImage, region: &BoundingBox) -> Result<RgbImage, RecognizerError> {
    if !region.fits_within(image.width(), image.height()) {
        return Err(RecognizerError::InvalidInput(format!(
            "region {:?} does not fit a {}x{} frame",
            region,
            image.width(),
            image.height()
        )));
    }
    Ok(imageops::crop_imm(image, region.x, region.y, region.width, region.height).to_image())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_centered_roi_matches_frame_center() {
        let roi = centered(640, 480, 200);
        assert_eq!(roi, BoundingBox::new(220, 140, 200, 200));
    }

    #[test]
    fn test_centered_roi_is_clamped_to_small_frames() {
        let roi = centered(120, 80, 200);
        assert_eq!(roi, BoundingBox::new(20, 0, 80, 80));
    }

    #[test]
    fn test_crop_reads_region_pixels() {
        let mut img = RgbImage::from_pixel(10, 10, Rgb([255, 255, 255]));
        img.put_pixel(5, 6, Rgb([1, 2, 3]));

        let cropped = apply(&img, &BoundingBox::new(4, 4, 3, 3)).unwrap();

        assert_eq!(cropped.dimensions(), (3, 3));
        assert_eq!(cropped.get_pixel(1, 2).0, [1, 2, 3]);
    }

    #[test]
    fn test_crop_rejects_out_of_bounds_region() {
        let img = RgbImage::new(10, 10);
        assert!(apply(&img, &BoundingBox::new(5, 5, 6, 2)).is_err());
    }
}
