use std::fs;
use std::path::{Path, PathBuf};

use image::DynamicImage;
use log::debug;

use crate::crop::expand_box;
use crate::error::PassphotoError;
use crate::face_detector::FaceDetector;
use crate::resize::{fit_within_bounds, flatten_alpha, resize_to_target};

/// Full pipeline for one photo: load → downscale for detection → detect →
/// per face expand, crop, resize, save.
///
/// Detection and cropping operate on the same buffer, so the detector's
/// coordinates are used as-is and never rescaled. Any per-face failure
/// aborts the whole call; outputs already written for earlier faces are
/// left in place. Nothing is written when no face is detected.
pub(crate) fn compose_pipeline(
    input: &Path,
    output: &Path,
    detector: &dyn FaceDetector,
    passport_size: (u32, u32),
    extra_space_ratio: f32,
    max_detection_dimension: u32,
) -> Result<Vec<PathBuf>, PassphotoError> {
    let decoded = image::open(input).map_err(|e| PassphotoError::SourceNotFound {
        path: input.to_path_buf(),
        reason: e.to_string(),
    })?;

    let working = fit_within_bounds(decoded, max_detection_dimension);
    let (width, height) = (working.width(), working.height());

    let gray = working.to_luma8();
    let faces = detector.detect(gray.as_raw(), width, height);
    debug!(
        "{}: {} face(s) at {}x{}",
        input.display(),
        faces.len(),
        width,
        height
    );

    if faces.is_empty() {
        return Err(PassphotoError::NoFaceDetected {
            path: input.to_path_buf(),
        });
    }

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| PassphotoError::SaveError {
                path: output.to_path_buf(),
                reason: e.to_string(),
            })?;
        }
    }

    let mut written = Vec::with_capacity(faces.len());
    for (index, face) in faces.iter().enumerate() {
        let rect = expand_box(face, width, height, extra_space_ratio)?;
        let cropped = working.crop_imm(rect.left, rect.top, rect.width(), rect.height());
        let passport = resize_to_target(&cropped, passport_size);
        let face_path = face_output_path(output, index + 1, faces.len());
        save_photo(&passport, &face_path)?;
        debug!("passport photo saved as {}", face_path.display());
        written.push(face_path);
    }

    Ok(written)
}

/// Derive the output path for face `index` (1-based) out of `total`.
///
/// A single face keeps the requested path untouched; multiple faces get the
/// index inserted before the extension, in detector order.
pub(crate) fn face_output_path(output: &Path, index: usize, total: usize) -> PathBuf {
    if total == 1 {
        return output.to_path_buf();
    }
    let stem = output
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("photo");
    match output.extension().and_then(|e| e.to_str()) {
        Some(ext) => output.with_file_name(format!("{stem}_{index}.{ext}")),
        None => output.with_file_name(format!("{stem}_{index}")),
    }
}

/// Write the image, flattening alpha so alpha-less formats still encode.
/// The container format is inferred from the path's extension.
fn save_photo(image: &DynamicImage, path: &Path) -> Result<(), PassphotoError> {
    flatten_alpha(image)
        .save(path)
        .map_err(|e| PassphotoError::SaveError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}
