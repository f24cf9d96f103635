//! Overlay rendering: ROI outline, detection boxes and digit labels

use crate::models::{BoundingBox, Detection, Label};
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;

const ROI_COLOR: Rgb<u8> = Rgb([0, 0, 255]);
const BOX_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

/// Pixel size of one font cell
const FONT_SCALE: u32 = 3;

/// 3x5 bitmap digits, one row per byte, bit 2 = left column
const DIGITS: [[u8; 5]; 10] = [
    [0b111, 0b101, 0b101, 0b101, 0b111],
    [0b010, 0b110, 0b010, 0b010, 0b111],
    [0b111, 0b001, 0b111, 0b100, 0b111],
    [0b111, 0b001, 0b111, 0b001, 0b111],
    [0b101, 0b101, 0b111, 0b001, 0b001],
    [0b111, 0b100, 0b111, 0b001, 0b111],
    [0b111, 0b100, 0b111, 0b101, 0b111],
    [0b111, 0b001, 0b010, 0b010, 0b010],
    [0b111, 0b101, 0b111, 0b101, 0b111],
    [0b111, 0b101, 0b111, 0b001, 0b111],
];

/// Copy of the frame with the ROI and every detection drawn on it
pub fn annotate(
    frame: &DynamicImage,
    roi: Option<BoundingBox>,
    detections: &[Detection],
) -> RgbImage {
    let mut canvas = frame.to_rgb8();

    if let Some(roi) = roi {
        draw_box(&mut canvas, &roi, ROI_COLOR);
    }
    for detection in detections {
        draw_box(&mut canvas, &detection.bbox, BOX_COLOR);
        draw_label(&mut canvas, &detection.bbox, detection.label);
    }
    canvas
}

/// Two-pixel outline
fn draw_box(canvas: &mut RgbImage, bbox: &BoundingBox, color: Rgb<u8>) {
    draw_hollow_rect_mut(canvas, to_rect(bbox), color);
    if bbox.width > 2 && bbox.height > 2 {
        let inner = Rect::at(bbox.x as i32 + 1, bbox.y as i32 + 1)
            .of_size(bbox.width - 2, bbox.height - 2);
        draw_hollow_rect_mut(canvas, inner, color);
    }
}

/// Digit drawn just above the box, or inside it when there is no room
fn draw_label(canvas: &mut RgbImage, bbox: &BoundingBox, label: Label) {
    let Some(rows) = DIGITS.get(label.0 as usize) else {
        return;
    };
    let glyph_height = (5 * FONT_SCALE + 2) as i32;
    let top = if bbox.y as i32 >= glyph_height {
        bbox.y as i32 - glyph_height
    } else {
        bbox.y as i32 + 2
    };
    let left = bbox.x as i32;

    for (row, bits) in rows.iter().enumerate() {
        for col in 0..3 {
            if bits & (0b100 >> col) != 0 {
                let cell = Rect::at(
                    left + (col * FONT_SCALE) as i32,
                    top + (row as u32 * FONT_SCALE) as i32,
                )
                .of_size(FONT_SCALE, FONT_SCALE);
                draw_filled_rect_mut(canvas, cell, BOX_COLOR);
            }
        }
    }
}

fn to_rect(bbox: &BoundingBox) -> Rect {
    Rect::at(bbox.x as i32, bbox.y as i32).of_size(bbox.width, bbox.height)
}
