//! Frame-to-detections orchestration
//!
//! ROI crop, preprocessing, segmentation, optional feature transform and
//! batch classification, with boxes and labels zipped back together by
//! position. Nothing is carried from one frame to the next.

use crate::classifier::Classifier;
use crate::config::PipelineConfig;
use crate::error::RecognizerError;
use crate::features::{FeatureMatrix, FeatureTransformer};
use crate::models::{BoundingBox, Detection, GLYPH_LEN};
use crate::preprocessing::pipeline::run_step;
use crate::preprocessing::steps::roi;
use crate::preprocessing::{Preprocessor, StepTiming};
use crate::segmentation::{Segment, Segmenter};
use image::{DynamicImage, RgbImage};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

/// Detections for one frame plus timing stats
#[derive(Debug, Clone, Serialize)]
pub struct FrameReport {
    pub detections: Vec<Detection>,
    /// Region that was analysed, in frame coordinates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roi: Option<BoundingBox>,
    pub total_time_ms: u64,
    pub steps: Vec<StepTiming>,
}

pub struct DigitPipeline {
    config: PipelineConfig,
    preprocessor: Preprocessor,
    segmenter: Segmenter,
    transformer: Option<FeatureTransformer>,
    classifier: Arc<dyn Classifier>,
}

impl DigitPipeline {
    /// Wire up the stages. Dimension mismatches between glyphs, statistics
    /// and classifier are reported here rather than on the first frame.
    pub fn new(
        config: PipelineConfig,
        classifier: Arc<dyn Classifier>,
        transformer: Option<FeatureTransformer>,
    ) -> Result<Self, RecognizerError> {
        let feature_dim = match &transformer {
            Some(t) => {
                if t.input_dim() != GLYPH_LEN {
                    return Err(RecognizerError::Configuration(format!(
                        "normalization statistics expect {} inputs but glyphs have {}",
                        t.input_dim(),
                        GLYPH_LEN
                    )));
                }
                t.output_dim()
            }
            None => GLYPH_LEN,
        };
        if classifier.input_dim() != feature_dim {
            return Err(RecognizerError::Configuration(format!(
                "{} classifier expects {} features but the pipeline produces {}",
                classifier.name(),
                classifier.input_dim(),
                feature_dim
            )));
        }
        if config.roi_size == Some(0) {
            return Err(RecognizerError::Configuration(
                "region of interest size must be positive".to_string(),
            ));
        }

        let preprocessor = Preprocessor::new(config.threshold);
        let segmenter = Segmenter::new(config.policy);
        tracing::info!(
            classifier = classifier.name(),
            feature_dim,
            transformer = transformer.is_some(),
            policy = segmenter.policy().as_str(),
            threshold = preprocessor.threshold(),
            "Digit pipeline ready"
        );

        Ok(Self {
            preprocessor,
            segmenter,
            config,
            transformer,
            classifier,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    /// Region analysed for a frame of the given size
    pub fn roi_for(&self, width: u32, height: u32) -> Option<BoundingBox> {
        self.config
            .roi_size
            .map(|size| roi::centered(width, height, size))
    }

    /// Detections in frame coordinates, in segmentation order
    pub fn run_on_frame(&self, frame: &DynamicImage) -> Result<Vec<Detection>, RecognizerError> {
        Ok(self.process(frame)?.detections)
    }

    /// Glyphs and their boxes in mask (ROI-local) coordinates
    pub fn segment_frame(&self, frame: &DynamicImage) -> Result<Vec<Segment>, RecognizerError> {
        let region = self.region(&checked_rgb(frame)?)?;
        let mask = self.preprocessor.preprocess(&region.0)?;
        Ok(self.segmenter.segment(&mask))
    }

    pub fn process(&self, frame: &DynamicImage) -> Result<FrameReport, RecognizerError> {
        let start = Instant::now();
        let mut steps = Vec::new();

        let rgb = checked_rgb(frame)?;
        let (region, roi) = run_step("roi", &mut steps, || self.region(&rgb))?;

        let preprocessed = self.preprocessor.process(&region)?;
        steps.extend(preprocessed.steps);
        let mask = preprocessed.mask;

        let segments = run_step("segment", &mut steps, || Ok(self.segmenter.segment(&mask)))?;

        if segments.is_empty() {
            return Ok(FrameReport {
                detections: Vec::new(),
                roi,
                total_time_ms: start.elapsed().as_millis() as u64,
                steps,
            });
        }

        let glyphs: Vec<_> = segments.iter().map(|s| &s.glyph).collect();
        let features = run_step("features", &mut steps, || match &self.transformer {
            Some(transformer) => transformer.transform_glyphs(&glyphs),
            None => Ok(FeatureMatrix::from_glyphs(&glyphs)),
        })?;

        let labels = run_step("classify", &mut steps, || self.classifier.predict(&features))?;
        if labels.len() != segments.len() {
            return Err(RecognizerError::Classification(format!(
                "{} classifier returned {} labels for {} glyphs",
                self.classifier.name(),
                labels.len(),
                segments.len()
            )));
        }

        let (dx, dy) = roi.map(|r| (r.x, r.y)).unwrap_or((0, 0));
        let detections: Vec<Detection> = segments
            .iter()
            .zip(labels)
            .map(|(segment, label)| Detection {
                bbox: segment.bbox.translate(dx, dy),
                label,
            })
            .collect();

        tracing::debug!(
            detections = detections.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Frame processed"
        );

        Ok(FrameReport {
            detections,
            roi,
            total_time_ms: start.elapsed().as_millis() as u64,
            steps,
        })
    }

    fn region(&self, rgb: &RgbImage) -> Result<(RgbImage, Option<BoundingBox>), RecognizerError> {
        match self.roi_for(rgb.width(), rgb.height()) {
            Some(r) => Ok((roi::apply(rgb, &r)?, Some(r))),
            None => Ok((rgb.clone(), None)),
        }
    }
}

fn checked_rgb(frame: &DynamicImage) -> Result<RgbImage, RecognizerError> {
    if frame.width() == 0 || frame.height() == 0 {
        return Err(RecognizerError::InvalidInput(format!(
            "frame is {}x{}",
            frame.width(),
            frame.height()
        )));
    }
    Ok(frame.to_rgb8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::NormalizationOrder;
    use crate::models::Label;
    use image::Rgb;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Labels every row with its index and counts invocations
    struct IndexClassifier {
        dim: usize,
        labels: Vec<Label>,
        calls: AtomicUsize,
    }

    impl IndexClassifier {
        fn new(dim: usize) -> Self {
            Self {
                dim,
                labels: crate::models::digit_labels(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl Classifier for IndexClassifier {
        fn name(&self) -> &'static str {
            "index"
        }

        fn input_dim(&self) -> usize {
            self.dim
        }

        fn labels(&self) -> &[Label] {
            &self.labels
        }

        fn predict(&self, features: &FeatureMatrix) -> Result<Vec<Label>, RecognizerError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok((0..features.rows()).map(|i| Label(i as u8 % 10)).collect())
        }
    }

    fn frame_with(boxes: &[BoundingBox], width: u32, height: u32) -> DynamicImage {
        let mut img = RgbImage::from_pixel(width, height, Rgb([245, 245, 245]));
        for b in boxes {
            for y in b.y..b.bottom() {
                for x in b.x..b.right() {
                    img.put_pixel(x, y, Rgb([10, 10, 10]));
                }
            }
        }
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn test_blank_frame_skips_classifier() {
        let classifier = Arc::new(IndexClassifier::new(GLYPH_LEN));
        let pipeline =
            DigitPipeline::new(PipelineConfig::default(), classifier.clone(), None).unwrap();

        let detections = pipeline.run_on_frame(&frame_with(&[], 64, 48)).unwrap();

        assert!(detections.is_empty());
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_detections_pair_with_segments_by_position() {
        let boxes = [
            BoundingBox::new(70, 5, 12, 30),
            BoundingBox::new(10, 20, 20, 30),
            BoundingBox::new(40, 40, 15, 15),
        ];
        let frame = frame_with(&boxes, 100, 80);
        let pipeline = DigitPipeline::new(
            PipelineConfig::default(),
            Arc::new(IndexClassifier::new(GLYPH_LEN)),
            None,
        )
        .unwrap();

        let segments = pipeline.segment_frame(&frame).unwrap();
        let detections = pipeline.run_on_frame(&frame).unwrap();

        assert_eq!(segments.len(), 3);
        assert_eq!(detections.len(), segments.len());
        for (i, (detection, segment)) in detections.iter().zip(&segments).enumerate() {
            assert_eq!(detection.bbox, segment.bbox);
            assert_eq!(detection.label, Label(i as u8));
        }
    }

    #[test]
    fn test_roi_boxes_are_reported_in_frame_coordinates() {
        let inside = BoundingBox::new(55, 45, 10, 20);
        let outside = BoundingBox::new(2, 2, 10, 10);
        let frame = frame_with(&[inside, outside], 120, 100);
        let config = PipelineConfig {
            roi_size: Some(40),
            ..PipelineConfig::default()
        };
        let pipeline =
            DigitPipeline::new(config, Arc::new(IndexClassifier::new(GLYPH_LEN)), None).unwrap();

        let report = pipeline.process(&frame).unwrap();

        assert_eq!(report.roi, Some(BoundingBox::new(40, 30, 40, 40)));
        assert_eq!(report.detections.len(), 1);
        assert_eq!(report.detections[0].bbox, inside);
    }

    #[test]
    fn test_dimension_mismatch_is_rejected_at_construction() {
        let err = DigitPipeline::new(
            PipelineConfig::default(),
            Arc::new(IndexClassifier::new(50)),
            None,
        )
        .err()
        .unwrap();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_transformer_output_feeds_classifier() {
        let samples = FeatureMatrix::new(ndarray::Array2::from_shape_fn(
            (4, GLYPH_LEN),
            |(r, c)| ((r * 7 + c) % 5) as f32 / 4.0,
        ));
        let basis = crate::features::ProjectionBasis::new(ndarray::Array2::from_shape_fn(
            (GLYPH_LEN, 3),
            |(r, c)| if r % 3 == c { 0.01 } else { 0.0 },
        ))
        .unwrap();
        let order = NormalizationOrder::ProjectThenStandardize;
        let transformer = FeatureTransformer::fit(order, Some(basis), &samples).unwrap();

        assert!(DigitPipeline::new(
            PipelineConfig::default(),
            Arc::new(IndexClassifier::new(GLYPH_LEN)),
            Some(transformer.clone()),
        )
        .is_err());

        let pipeline = DigitPipeline::new(
            PipelineConfig::default(),
            Arc::new(IndexClassifier::new(3)),
            Some(transformer),
        )
        .unwrap();
        let frame = frame_with(&[BoundingBox::new(10, 10, 20, 30)], 64, 64);
        assert_eq!(pipeline.run_on_frame(&frame).unwrap().len(), 1);
    }

    #[test]
    fn test_empty_frame_is_invalid_input() {
        let pipeline = DigitPipeline::new(
            PipelineConfig::default(),
            Arc::new(IndexClassifier::new(GLYPH_LEN)),
            None,
        )
        .unwrap();
        let err = pipeline
            .run_on_frame(&DynamicImage::ImageRgb8(RgbImage::new(0, 0)))
            .unwrap_err();
        assert!(matches!(err, RecognizerError::InvalidInput(_)));
    }

    #[test]
    fn test_report_lists_stage_timings() {
        let pipeline = DigitPipeline::new(
            PipelineConfig::default(),
            Arc::new(IndexClassifier::new(GLYPH_LEN)),
            None,
        )
        .unwrap();
        let frame = frame_with(&[BoundingBox::new(10, 10, 20, 30)], 64, 64);

        let report = pipeline.process(&frame).unwrap();
        let names: Vec<_> = report.steps.iter().map(|s| s.name.as_str()).collect();

        assert_eq!(
            names,
            vec!["roi", "grayscale", "threshold", "segment", "features", "classify"]
        );
    }
}
