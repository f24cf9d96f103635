use image::{GrayImage, Luma};

/// Resample with pixel-area averaging.
///
/// Every destination pixel covers a rectangle of the source; its value is the
/// mean of the source pixels weighted by their overlap with that rectangle.
/// When shrinking this is classic area interpolation. When enlarging the
/// rectangle is smaller than one source pixel, so the result is
/// nearest-neighbour with blended values where the rectangle straddles two
/// source pixels; stroke thickness scales proportionally with the box.
pub fn area(src: &GrayImage, dst_width: u32, dst_height: u32) -> GrayImage {
    let (src_width, src_height) = src.dimensions();
    if src_width == 0 || src_height == 0 || dst_width == 0 || dst_height == 0 {
        return GrayImage::new(dst_width, dst_height);
    }
    if (src_width, src_height) == (dst_width, dst_height) {
        return src.clone();
    }

    let x_weights = axis_weights(src_width, dst_width);
    let y_weights = axis_weights(src_height, dst_height);

    GrayImage::from_fn(dst_width, dst_height, |dx, dy| {
        let mut sum = 0.0f64;
        let mut total = 0.0f64;
        for &(sy, wy) in &y_weights[dy as usize] {
            for &(sx, wx) in &x_weights[dx as usize] {
                let w = wx * wy;
                sum += w * src.get_pixel(sx, sy).0[0] as f64;
                total += w;
            }
        }
        let value = if total > 0.0 { sum / total } else { 0.0 };
        Luma([value.round().clamp(0.0, 255.0) as u8])
    })
}

/// For each destination index, the source indices it overlaps and the overlap length
fn axis_weights(src_len: u32, dst_len: u32) -> Vec<Vec<(u32, f64)>> {
    let scale = src_len as f64 / dst_len as f64;
    (0..dst_len)
        .map(|d| {
            let start = d as f64 * scale;
            let end = ((d + 1) as f64 * scale).min(src_len as f64);
            let first = start.floor() as u32;
            let last = (end.ceil() as u32).min(src_len);
            (first..last)
                .filter_map(|s| {
                    let overlap = (end.min(s as f64 + 1.0) - start.max(s as f64)).max(0.0);
                    (overlap > 1e-9).then_some((s, overlap))
                })
                .collect()
        })
        .collect()
}
