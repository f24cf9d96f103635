use digit_recognizer::error::RecognizerError;
use digit_recognizer::models::digit_labels;
use digit_recognizer::preprocessing::steps::resize;
use digit_recognizer::preprocessing::Preprocessor;
use digit_recognizer::{
    BoundingBox, Classifier, DigitPipeline, FeatureMatrix, Label, PipelineConfig, Segmenter,
    GLYPH_LEN, GLYPH_SIZE,
};
use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const PAPER: Rgb<u8> = Rgb([235, 235, 230]);
const INK: Rgb<u8> = Rgb([15, 20, 25]);

/// Hands out scripted labels in call order, one per row
struct ScriptedClassifier {
    script: Vec<Label>,
    next: AtomicUsize,
    labels: Vec<Label>,
}

impl ScriptedClassifier {
    fn new(script: &[u8]) -> Self {
        Self {
            script: script.iter().copied().map(Label).collect(),
            next: AtomicUsize::new(0),
            labels: digit_labels(),
        }
    }
}

impl Classifier for ScriptedClassifier {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn input_dim(&self) -> usize {
        GLYPH_LEN
    }

    fn labels(&self) -> &[Label] {
        &self.labels
    }

    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<Label>, RecognizerError> {
        Ok((0..features.rows())
            .map(|_| {
                let i = self.next.fetch_add(1, Ordering::SeqCst);
                self.script[i % self.script.len()]
            })
            .collect())
    }
}

fn paint(img: &mut RgbImage, x0: u32, y0: u32, w: u32, h: u32) {
    for y in y0..y0 + h {
        for x in x0..x0 + w {
            img.put_pixel(x, y, INK);
        }
    }
}

/// A vertical bar ("1") and a hollow ring ("0"), both 60px tall
fn one_and_zero() -> (DynamicImage, BoundingBox, BoundingBox) {
    let mut img = RgbImage::from_pixel(200, 120, PAPER);
    paint(&mut img, 30, 30, 12, 60);

    paint(&mut img, 80, 30, 40, 8);
    paint(&mut img, 80, 82, 40, 8);
    paint(&mut img, 80, 30, 8, 60);
    paint(&mut img, 112, 30, 8, 60);

    (
        DynamicImage::ImageRgb8(img),
        BoundingBox::new(30, 30, 12, 60),
        BoundingBox::new(80, 30, 40, 60),
    )
}

#[test]
fn test_blank_frame_yields_no_glyphs() {
    let frame = RgbImage::from_pixel(160, 120, PAPER);
    let mask = Preprocessor::default().preprocess(&frame).unwrap();
    assert!(Segmenter::default().segment(&mask).is_empty());
}

#[test]
fn test_single_rectangle_box_is_recovered() {
    let mut frame = RgbImage::from_pixel(160, 120, PAPER);
    paint(&mut frame, 47, 21, 33, 58);

    let mask = Preprocessor::default().preprocess(&frame).unwrap();
    let segments = Segmenter::default().segment(&mask);

    assert_eq!(segments.len(), 1);
    let bbox = segments[0].bbox;
    let expected = BoundingBox::new(47, 21, 33, 58);
    assert!(bbox.x.abs_diff(expected.x) <= 1);
    assert!(bbox.y.abs_diff(expected.y) <= 1);
    assert!(bbox.width.abs_diff(expected.width) <= 1);
    assert!(bbox.height.abs_diff(expected.height) <= 1);
}

#[test]
fn test_glyph_resize_round_trip_keeps_shape() {
    // Ring silhouette in a 40x60 box
    let (w, h) = (40, 60);
    let original = GrayImage::from_fn(w, h, |x, y| {
        let edge = x < 8 || x >= w - 8 || y < 8 || y >= h - 8;
        Luma([if edge { 255 } else { 0 }])
    });

    let glyph = resize::area(&original, GLYPH_SIZE, GLYPH_SIZE);
    let restored = resize::area(&glyph, w, h);

    let (mut intersection, mut union) = (0u32, 0u32);
    for (a, b) in original.pixels().zip(restored.pixels()) {
        let a = a.0[0] >= 128;
        let b = b.0[0] >= 128;
        intersection += (a && b) as u32;
        union += (a || b) as u32;
    }
    let iou = intersection as f32 / union as f32;
    assert!(iou >= 0.8, "IoU {} below 0.8", iou);
}

#[test]
fn test_preprocess_is_bit_identical_across_runs() {
    let (frame, _, _) = one_and_zero();
    let rgb = frame.to_rgb8();
    let preprocessor = Preprocessor::default();

    let a = preprocessor.preprocess(&rgb).unwrap();
    let b = preprocessor.preprocess(&rgb).unwrap();

    assert_eq!(a, b);
}

#[test]
fn test_one_and_zero_end_to_end() {
    let (frame, left, right) = one_and_zero();
    let classifier = Arc::new(ScriptedClassifier::new(&[1, 0]));
    let pipeline = DigitPipeline::new(PipelineConfig::default(), classifier, None).unwrap();

    // Both shapes start on the same row, so raster discovery is left to right
    let segments = pipeline.segment_frame(&frame).unwrap();
    assert_eq!(
        segments.iter().map(|s| s.bbox).collect::<Vec<_>>(),
        vec![left, right]
    );

    let detections = pipeline.run_on_frame(&frame).unwrap();

    assert_eq!(detections.len(), 2);
    assert_eq!(detections[0].bbox, left);
    assert_eq!(detections[0].label, Label(1));
    assert_eq!(detections[1].bbox, right);
    assert_eq!(detections[1].label, Label(0));
}

#[test]
fn test_ring_is_a_single_glyph() {
    let (frame, _, right) = one_and_zero();
    let pipeline = DigitPipeline::new(
        PipelineConfig::default(),
        Arc::new(ScriptedClassifier::new(&[0])),
        None,
    )
    .unwrap();

    let segments = pipeline.segment_frame(&frame).unwrap();

    assert_eq!(segments.iter().filter(|s| s.bbox == right).count(), 1);
    assert_eq!(segments.len(), 2);
}

#[test]
fn test_failing_frame_does_not_affect_the_next() {
    let (frame, left, _) = one_and_zero();
    let pipeline = DigitPipeline::new(
        PipelineConfig::default(),
        Arc::new(ScriptedClassifier::new(&[7])),
        None,
    )
    .unwrap();

    let empty = DynamicImage::ImageRgb8(RgbImage::new(0, 0));
    assert!(pipeline.run_on_frame(&empty).is_err());

    let detections = pipeline.run_on_frame(&frame).unwrap();
    assert_eq!(detections[0].bbox, left);
    assert!(detections.iter().all(|d| d.label == Label(7)));
}
