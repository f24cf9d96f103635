use crate::models::BoundingBox;
use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};
use imageproc::point::Point;

/// Bounding boxes of the outermost foreground components.
///
/// Borders are traced with Suzuki-Abe border following, so a component's
/// holes (the inside of a "0") are never reported. Boxes come back in
/// discovery order: raster order of each component's first border pixel,
/// i.e. top-most row first, left-most within that row.
pub fn external_boxes(mask: &GrayImage) -> Vec<BoundingBox> {
    find_contours::<u32>(mask)
        .into_iter()
        .filter(|contour| {
            matches!(contour.border_type, BorderType::Outer) && contour.parent.is_none()
        })
        .filter_map(|contour| bounding_box(&contour.points))
        .collect()
}

/// Smallest axis-aligned box enclosing all points
fn bounding_box(points: &[Point<u32>]) -> Option<BoundingBox> {
    let first = points.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    Some(BoundingBox::from_extent(min_x, min_y, max_x, max_y))
}
