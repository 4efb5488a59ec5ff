use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use passphoto::{DetectionParams, PassportCropper, RustfaceDetector};

/// Crop photos to passport framing around detected faces.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Path to an image file or a directory of images.
    #[arg(short, long)]
    input: PathBuf,

    /// Output file (single image) or output directory (batch).
    #[arg(short, long)]
    output: PathBuf,

    /// Passport width in pixels.
    #[arg(long, default_value_t = 900)]
    width: u32,

    /// Passport height in pixels.
    #[arg(long, default_value_t = 950)]
    height: u32,

    /// Margin around the face as a fraction of its size.
    #[arg(long, default_value_t = 0.3)]
    extra_space: f32,

    /// Cap on the longer image side before detection.
    #[arg(long, default_value_t = 1000)]
    max_detection_dim: u32,

    /// Path to the SeetaFace model (overrides PASSPHOTO_MODEL).
    #[arg(long)]
    model: Option<PathBuf>,

    /// Detector pyramid scale factor (>= 1.0).
    #[arg(long, default_value_t = 1.1)]
    scale_factor: f32,

    /// Cascade agreement required per detection (>= 1).
    #[arg(long, default_value_t = 5)]
    min_neighbors: u32,

    /// Minimum face width in pixels.
    #[arg(long, default_value_t = 40)]
    min_width: u32,

    /// Minimum face height in pixels.
    #[arg(long, default_value_t = 30)]
    min_height: u32,
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let params = DetectionParams {
        scale_factor: args.scale_factor,
        min_neighbors: args.min_neighbors,
        min_size: (args.min_width, args.min_height),
    };

    let mut cropper = PassportCropper::new()
        .passport_size(args.width, args.height)
        .extra_space_ratio(args.extra_space)
        .max_detection_dimension(args.max_detection_dim)
        .detection_params(params);

    if let Some(model) = &args.model {
        let detector = RustfaceDetector::from_model_path(model, params)
            .with_context(|| format!("loading model {}", model.display()))?;
        cropper = cropper.face_detector(Box::new(detector));
    }

    if args.input.is_dir() {
        fs::create_dir_all(&args.output)
            .with_context(|| format!("creating output directory {}", args.output.display()))?;
        let report = cropper.process_directory(&args.input, &args.output)?;
        for outcome in &report.outcomes {
            match &outcome.result {
                Ok(written) => {
                    for path in written {
                        info!("wrote {}", path.display());
                    }
                }
                Err(err) => warn!("{}: {err}", outcome.source.display()),
            }
        }
        info!(
            "{} file(s) processed, {} failed",
            report.processed(),
            report.failed()
        );
    } else {
        let written = cropper
            .compose_one(&args.input, &args.output)
            .with_context(|| format!("processing {}", args.input.display()))?;
        for path in written {
            info!("wrote {}", path.display());
        }
    }

    Ok(())
}

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}
