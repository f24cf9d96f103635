//! Frame loop: load artifacts once, then process frames until the capture
//! source runs dry. Bad frames are logged and skipped; configuration errors
//! end the run.

use crate::capture::{CaptureSource, CapturedFrame, ImageSequence};
use crate::classifiers::{load_classifier, ClassifierInfo};
use crate::config::Config;
use crate::error::{ErrorReport, RecognizerError};
use crate::features::FeatureTransformer;
use crate::pipeline::{DigitPipeline, FrameReport};
use crate::render;
use serde::Serialize;
use std::fs;
use std::io::Write;

/// One stdout line per successfully processed frame
#[derive(Serialize)]
pub struct FrameRecord<'a> {
    pub frame: usize,
    pub source: String,
    #[serde(flatten)]
    pub report: &'a FrameReport,
}

/// One stdout line per skipped frame
#[derive(Serialize)]
pub struct SkippedRecord {
    pub frame: usize,
    pub source: Option<String>,
    #[serde(flatten)]
    pub error: ErrorReport,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub frames: usize,
    pub skipped: usize,
    pub detections: usize,
}

/// Load the classifier and optional statistics and assemble the pipeline
pub fn build_pipeline(config: &Config) -> Result<DigitPipeline, RecognizerError> {
    let classifier = load_classifier(&config.classifier_path, config.channels_last)?;
    let transformer = config
        .stats_path
        .as_deref()
        .map(FeatureTransformer::load)
        .transpose()?;

    let pipeline = DigitPipeline::new(config.pipeline, classifier, transformer)?;

    let info = ClassifierInfo::of(pipeline.classifier());
    tracing::info!(
        classifier = info.name,
        input_dim = info.input_dim,
        labels = ?info.labels,
        roi_size = ?pipeline.config().roi_size,
        "Classifier loaded"
    );
    Ok(pipeline)
}

pub fn run<W: Write>(config: &Config, out: &mut W) -> Result<RunSummary, RecognizerError> {
    let pipeline = build_pipeline(config)?;
    let mut source = ImageSequence::from_inputs(&config.inputs)?;
    if source.is_empty() {
        tracing::warn!("No image files found in the given inputs");
    } else {
        tracing::info!("Processing {} frame(s)", source.len());
    }

    if let Some(dir) = &config.annotate_dir {
        fs::create_dir_all(dir)?;
    }

    run_source(&pipeline, &mut source, config, out)
}

/// Drive any capture source through the pipeline
pub fn run_source<S: CaptureSource, W: Write>(
    pipeline: &DigitPipeline,
    source: &mut S,
    config: &Config,
    out: &mut W,
) -> Result<RunSummary, RecognizerError> {
    let mut summary = RunSummary::default();
    let mut attempted = 0usize;

    loop {
        let frame = match source.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => break,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                tracing::warn!("Skipping frame {}: {}", attempted, e);
                write_line(
                    out,
                    &SkippedRecord {
                        frame: attempted,
                        source: None,
                        error: e.report(),
                    },
                )?;
                summary.skipped += 1;
                attempted += 1;
                continue;
            }
        };
        attempted = frame.index + 1;

        match pipeline.process(&frame.image) {
            Ok(report) => {
                summary.frames += 1;
                summary.detections += report.detections.len();
                for detection in &report.detections {
                    tracing::debug!(
                        frame = frame.index,
                        label = %detection.label,
                        x = detection.bbox.x,
                        y = detection.bbox.y,
                        "Digit detected"
                    );
                }
                write_line(
                    out,
                    &FrameRecord {
                        frame: frame.index,
                        source: frame.source.display().to_string(),
                        report: &report,
                    },
                )?;
                match save_annotation(config, &frame, &report) {
                    Ok(()) => {}
                    Err(e) if e.is_fatal() => return Err(e),
                    Err(e) => {
                        tracing::warn!("Cannot save overlay for {}: {}", frame.source.display(), e)
                    }
                }
            }
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                tracing::warn!("Skipping {}: {}", frame.source.display(), e);
                write_line(
                    out,
                    &SkippedRecord {
                        frame: frame.index,
                        source: Some(frame.source.display().to_string()),
                        error: e.report(),
                    },
                )?;
                summary.skipped += 1;
            }
        }
    }

    tracing::info!(
        frames = summary.frames,
        skipped = summary.skipped,
        detections = summary.detections,
        "Capture source exhausted"
    );
    Ok(summary)
}

fn save_annotation(
    config: &Config,
    frame: &CapturedFrame,
    report: &FrameReport,
) -> Result<(), RecognizerError> {
    let Some(dir) = &config.annotate_dir else {
        return Ok(());
    };
    let annotated = render::annotate(&frame.image, report.roi, &report.detections);
    let path = dir.join(format!("frame_{:05}.png", frame.index));
    annotated.save(&path)?;
    tracing::debug!("Saved overlay to {}", path.display());
    Ok(())
}

fn write_line<W: Write, T: Serialize>(out: &mut W, record: &T) -> Result<(), RecognizerError> {
    serde_json::to_writer(&mut *out, record).map_err(std::io::Error::from)?;
    writeln!(out)?;
    Ok(())
}
