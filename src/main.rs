use clap::Parser;
use digit_recognizer::config::{Config, PipelineConfig};
use digit_recognizer::segmentation::{SegmentationPolicy, DEFAULT_MIN_GLYPH_DIM};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "digit-recognizer")]
#[command(about = "Find and classify handwritten digits in image frames")]
#[command(version)]
pub struct Args {
    /// Frames to process: image files or directories of images
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Classifier artifact (.json linear SVM, .rten network)
    #[arg(long, env = "DIGITS_CLASSIFIER")]
    pub classifier: PathBuf,

    /// Normalization statistics (mean, scale, basis) for the classical path
    #[arg(long, env = "DIGITS_STATS")]
    pub stats: Option<PathBuf>,

    /// Feed the network classifier channels-last tensors
    #[arg(long, env = "DIGITS_CHANNELS_LAST")]
    pub channels_last: bool,

    /// Gray level above which pixels count as background
    #[arg(long, env = "DIGITS_THRESHOLD", default_value = "128")]
    pub threshold: u8,

    /// Drop glyph boxes whose width or height is at most this many pixels
    #[arg(long, env = "DIGITS_MIN_GLYPH_SIZE", default_value_t = DEFAULT_MIN_GLYPH_DIM)]
    pub min_glyph_size: u32,

    /// Keep every contour, however small (legacy behaviour)
    #[arg(long)]
    pub unfiltered: bool,

    /// Only analyse a centered square of this size
    #[arg(long, env = "DIGITS_ROI_SIZE")]
    pub roi_size: Option<u32>,

    /// Write annotated frames to this directory
    #[arg(long, env = "DIGITS_ANNOTATE_DIR")]
    pub annotate_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        let policy = if args.unfiltered {
            SegmentationPolicy::Unfiltered
        } else {
            SegmentationPolicy::Filtered {
                min_dim: args.min_glyph_size,
            }
        };
        Self {
            classifier_path: args.classifier,
            stats_path: args.stats,
            channels_last: args.channels_last,
            inputs: args.inputs,
            annotate_dir: args.annotate_dir,
            pipeline: PipelineConfig {
                threshold: args.threshold,
                policy,
                roi_size: args.roi_size,
            },
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing; stdout is reserved for detection records
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from(args);

    tracing::info!("Starting digit-recognizer v{}", env!("CARGO_PKG_VERSION"));

    let stdout = std::io::stdout();
    let summary = digit_recognizer::runner::run(&config, &mut stdout.lock())?;

    tracing::info!(
        "Processed {} frame(s), skipped {}, found {} digit(s)",
        summary.frames,
        summary.skipped,
        summary.detections
    );
    Ok(())
}
