use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::error::PassphotoError;
use crate::face_detector::{DetectionParams, FaceBounds, FaceDetector};

/// Environment variable naming the SeetaFace model file.
pub const MODEL_ENV: &str = "PASSPHOTO_MODEL";

/// Fallback model location relative to the working directory.
const DEFAULT_MODEL_PATH: &str = "models/seeta_fd_frontal_v1.0.bin";

/// rustface rejects faces below this size regardless of configuration.
const RUSTFACE_MIN_FACE: u32 = 20;

/// Face detector backed by the `rustface` crate (SeetaFace engine).
///
/// The model is parsed once; each detection call builds a fresh rustface
/// detector from a clone of it, since the engine itself is not `Sync`.
pub struct RustfaceDetector {
    model: rustface::Model,
    params: DetectionParams,
}

impl RustfaceDetector {
    /// Load the SeetaFace model from `path`.
    ///
    /// Fails with [`PassphotoError::DetectorUnavailable`] when the file is
    /// missing or not a valid model.
    pub fn from_model_path(path: &Path, params: DetectionParams) -> Result<Self, PassphotoError> {
        params.validate()?;
        let bytes = std::fs::read(path).map_err(|e| {
            PassphotoError::DetectorUnavailable(format!(
                "cannot read model {}: {e}",
                path.display()
            ))
        })?;
        let model = rustface::read_model(Cursor::new(bytes)).map_err(|e| {
            PassphotoError::DetectorUnavailable(format!(
                "cannot parse model {}: {e}",
                path.display()
            ))
        })?;
        Ok(Self { model, params })
    }

    /// Construct a detector from the process-wide default model, resolved
    /// from `PASSPHOTO_MODEL` or the `models/` directory.
    ///
    /// The model file is read and parsed at most once per process; later
    /// calls reuse the cached copy. A load failure is also cached, since it
    /// signals a misconfigured environment rather than a transient error.
    pub fn default_model(params: DetectionParams) -> Result<Self, PassphotoError> {
        static MODEL: OnceLock<Result<rustface::Model, String>> = OnceLock::new();

        params.validate()?;
        let cached = MODEL.get_or_init(|| {
            let path = std::env::var_os(MODEL_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH));
            let bytes = std::fs::read(&path)
                .map_err(|e| format!("cannot read model {}: {e}", path.display()))?;
            rustface::read_model(Cursor::new(bytes))
                .map_err(|e| format!("cannot parse model {}: {e}", path.display()))
        });
        match cached {
            Ok(model) => Ok(Self {
                model: model.clone(),
                params,
            }),
            Err(reason) => Err(PassphotoError::DetectorUnavailable(reason.clone())),
        }
    }
}

impl FaceDetector for RustfaceDetector {
    fn detect(&self, gray: &[u8], width: u32, height: u32) -> Vec<FaceBounds> {
        let mut detector = rustface::create_detector_with_model(self.model.clone());

        let (min_w, min_h) = self.params.min_size;
        detector.set_min_face_size(min_w.min(min_h).max(RUSTFACE_MIN_FACE));
        // min_neighbors counts cascade agreement; rustface expresses the
        // same sensitivity as a score threshold (default 5 → 2.0).
        detector.set_score_thresh(self.params.min_neighbors as f64 * 0.4);
        // scale_factor is per-step pyramid growth; rustface walks the
        // pyramid downward and needs a strict shrink per step.
        detector.set_pyramid_scale_factor((1.0 / self.params.scale_factor).clamp(0.1, 0.99));
        detector.set_slide_window_step(4, 4);

        let faces = detector.detect(&rustface::ImageData::new(gray, width, height));

        faces
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                let x = (bbox.x().max(0) as u32).min(width);
                let y = (bbox.y().max(0) as u32).min(height);
                FaceBounds {
                    x,
                    y,
                    width: bbox.width().min(width - x),
                    height: bbox.height().min(height - y),
                    confidence: face.score(),
                }
            })
            // Slivers clipped down to nothing cannot be cropped
            .filter(|bounds| bounds.width > 0 && bounds.height > 0)
            .collect()
    }
}
