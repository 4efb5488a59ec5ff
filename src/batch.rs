use std::path::{Path, PathBuf};

use log::{debug, warn};
use walkdir::WalkDir;

use crate::compose::compose_pipeline;
use crate::error::PassphotoError;
use crate::face_detector::FaceDetector;

/// Raster extensions the batch runner picks up.
const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "bmp", "webp"];

/// Outcome of one file in a directory run.
#[derive(Debug)]
pub struct FileOutcome {
    /// Source image path.
    pub source: PathBuf,
    /// Written output paths, or the error that stopped this file.
    pub result: Result<Vec<PathBuf>, PassphotoError>,
}

/// Summary of a directory run, one entry per candidate file in sorted
/// order. Carries the full per-file error detail so callers can report
/// failures without the runner logging on their behalf.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Per-file outcomes, in the order the files were processed.
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    /// Number of files processed successfully.
    pub fn processed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    /// Number of files that failed.
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.processed()
    }
}

/// Run the composer over every image directly under `input_dir`.
///
/// Each file's output lands at `output_dir/passport_<filename>`. A failure
/// on one file is recorded in the report and never stops the remaining
/// files.
pub(crate) fn run_directory(
    input_dir: &Path,
    output_dir: &Path,
    detector: &dyn FaceDetector,
    passport_size: (u32, u32),
    extra_space_ratio: f32,
    max_detection_dimension: u32,
) -> Result<BatchReport, PassphotoError> {
    let images = collect_images(input_dir)?;
    debug!("{}: {} candidate image(s)", input_dir.display(), images.len());

    let mut report = BatchReport::default();
    for source in images {
        let output = batch_output_path(output_dir, &source);
        let result = compose_pipeline(
            &source,
            &output,
            detector,
            passport_size,
            extra_space_ratio,
            max_detection_dimension,
        );
        if let Err(err) = &result {
            warn!("failed to process {}: {err}", source.display());
        }
        report.outcomes.push(FileOutcome { source, result });
    }

    Ok(report)
}

/// List candidate images directly under `dir` (non-recursive), sorted for
/// deterministic processing order.
pub(crate) fn collect_images(dir: &Path) -> Result<Vec<PathBuf>, PassphotoError> {
    if !dir.is_dir() {
        return Err(PassphotoError::SourceNotFound {
            path: dir.to_path_buf(),
            reason: "not a directory".into(),
        });
    }

    let mut images = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
    {
        match entry.path().extension().and_then(|e| e.to_str()) {
            Some(ext) if IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) => {
                images.push(entry.path().to_path_buf());
            }
            _ => debug!("skipping non-image entry {}", entry.path().display()),
        }
    }
    images.sort();
    Ok(images)
}

/// Output path for a batch item: `output_dir/passport_<filename>`.
fn batch_output_path(output_dir: &Path, source: &Path) -> PathBuf {
    match source.file_name().and_then(|n| n.to_str()) {
        Some(name) => output_dir.join(format!("passport_{name}")),
        None => output_dir.join("passport_photo.jpg"),
    }
}
