//! Passport photo cropping around detected faces.
//!
//! Detects faces in a photograph, expands each detection by a configurable
//! margin, crops, and resizes the result to passport dimensions while
//! preserving the aspect ratio. Works on single images or whole
//! directories, with per-file failure isolation in directory mode.
//!
//! # Example
//!
//! ```no_run
//! use passphoto::PassportCropper;
//!
//! let written = PassportCropper::new()
//!     .passport_size(900, 950)
//!     .extra_space_ratio(0.3)
//!     .compose_one("photo.jpg", "out/passport.jpg")
//!     .unwrap();
//! println!("wrote {} photo(s)", written.len());
//! ```
#![warn(missing_docs)]

mod batch;
mod compose;
mod crop;
mod error;
/// Face detection traits and data types.
pub mod face_detector;
mod resize;
#[cfg(feature = "rustface")]
/// Built-in SeetaFace-based face detector backend.
pub mod rustface_backend;

use std::path::{Path, PathBuf};

/// Per-file outcomes of a directory run.
pub use batch::{BatchReport, FileOutcome};
/// Crop rectangle type and face box expansion.
pub use crop::{expand_box, CropRect};
/// Error type returned by passphoto operations.
pub use error::PassphotoError;
/// Face detection trait, bounding-box type, and sensitivity knobs.
pub use face_detector::{DetectionParams, FaceBounds, FaceDetector};
/// Aspect-ratio-preserving resize entry points.
pub use resize::{fit_within_bounds, resize_to_target};
#[cfg(feature = "rustface")]
/// Built-in detector that loads a SeetaFace model from disk.
pub use rustface_backend::RustfaceDetector;

/// Default passport output size in pixels (width, height).
pub const DEFAULT_PASSPORT_SIZE: (u32, u32) = (900, 950);

/// Default margin added around a face box, as a fraction of its size.
pub const DEFAULT_EXTRA_SPACE_RATIO: f32 = 0.3;

/// Default cap on the longer image side before detection runs.
pub const DEFAULT_MAX_DETECTION_DIMENSION: u32 = 1000;

/// Builder for the passport cropping pipeline.
///
/// Configures the target size, the margin around detected faces, the
/// detection-time downscale cap, and the detector backend, then processes
/// a single image with [`compose_one`](Self::compose_one) or a whole
/// directory with [`process_directory`](Self::process_directory).
pub struct PassportCropper {
    passport_size: (u32, u32),
    extra_space_ratio: f32,
    max_detection_dimension: u32,
    detection_params: DetectionParams,
    /// User-provided detector. When `None`, the built-in rustface backend
    /// is loaded lazily (if compiled in).
    detector: Option<Box<dyn FaceDetector>>,
}

impl Default for PassportCropper {
    fn default() -> Self {
        Self::new()
    }
}

impl PassportCropper {
    /// Create a cropper with the default passport configuration.
    pub fn new() -> Self {
        Self {
            passport_size: DEFAULT_PASSPORT_SIZE,
            extra_space_ratio: DEFAULT_EXTRA_SPACE_RATIO,
            max_detection_dimension: DEFAULT_MAX_DETECTION_DIMENSION,
            detection_params: DetectionParams::default(),
            detector: None,
        }
    }

    /// Set the passport output size in pixels (default: 900×950).
    ///
    /// Outputs fit within this box with the aspect ratio preserved; at
    /// least one dimension equals its target, and nothing is padded.
    pub fn passport_size(mut self, width: u32, height: u32) -> Self {
        self.passport_size = (width, height);
        self
    }

    /// Set the margin added around a face box on every side, as a fraction
    /// of the box's width/height (default: 0.3). Must be >= 0.
    pub fn extra_space_ratio(mut self, ratio: f32) -> Self {
        self.extra_space_ratio = ratio;
        self
    }

    /// Set the cap on the longer image side before detection runs
    /// (default: 1000). Larger inputs are downscaled first; cropping then
    /// happens on the downscaled image, so coordinates stay consistent.
    pub fn max_detection_dimension(mut self, dimension: u32) -> Self {
        self.max_detection_dimension = dimension;
        self
    }

    /// Set the sensitivity knobs forwarded to the detection backend.
    pub fn detection_params(mut self, params: DetectionParams) -> Self {
        self.detection_params = params;
        self
    }

    /// Provide a custom face detector implementation.
    ///
    /// When set, this detector is used instead of the built-in rustface
    /// backend, allowing ONNX, dlib, or any other detection engine.
    ///
    /// ```no_run
    /// use passphoto::{FaceBounds, FaceDetector, PassportCropper};
    ///
    /// struct MyDetector;
    /// impl FaceDetector for MyDetector {
    ///     fn detect(&self, gray: &[u8], width: u32, height: u32) -> Vec<FaceBounds> {
    ///         vec![]
    ///     }
    /// }
    ///
    /// let cropper = PassportCropper::new().face_detector(Box::new(MyDetector));
    /// ```
    pub fn face_detector(mut self, detector: Box<dyn FaceDetector>) -> Self {
        self.detector = Some(detector);
        self
    }

    /// Crop one photo to passport framing and return the written paths.
    ///
    /// With a single detected face the output lands at exactly `output`;
    /// with N faces, `_1` … `_N` are inserted before the extension, in
    /// detector order. The output directory is created if absent. Errors
    /// propagate to the caller: nothing is written on `NoFaceDetected`,
    /// and a failure on any face aborts the whole call.
    pub fn compose_one(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<Vec<PathBuf>, PassphotoError> {
        self.validate()?;
        let detector = self.resolve_detector()?;
        compose::compose_pipeline(
            input.as_ref(),
            output.as_ref(),
            detector.as_detector(),
            self.passport_size,
            self.extra_space_ratio,
            self.max_detection_dimension,
        )
    }

    /// Crop every image directly under `input_dir` (non-recursive), writing
    /// each result to `output_dir/passport_<filename>`.
    ///
    /// Per-file failures are recorded in the returned [`BatchReport`] and
    /// never stop the remaining files. Only configuration errors and an
    /// unavailable detector fail the whole run; the detector is resolved
    /// once, before the first file.
    pub fn process_directory(
        &self,
        input_dir: impl AsRef<Path>,
        output_dir: impl AsRef<Path>,
    ) -> Result<BatchReport, PassphotoError> {
        self.validate()?;
        let detector = self.resolve_detector()?;
        batch::run_directory(
            input_dir.as_ref(),
            output_dir.as_ref(),
            detector.as_detector(),
            self.passport_size,
            self.extra_space_ratio,
            self.max_detection_dimension,
        )
    }

    fn validate(&self) -> Result<(), PassphotoError> {
        if !(self.extra_space_ratio >= 0.0) {
            return Err(PassphotoError::InvalidExpansionRatio(self.extra_space_ratio));
        }
        let (width, height) = self.passport_size;
        if width == 0 || height == 0 {
            return Err(PassphotoError::InvalidTargetSize(width, height));
        }
        if self.max_detection_dimension == 0 {
            return Err(PassphotoError::InvalidMaxDimension);
        }
        self.detection_params.validate()
    }

    fn resolve_detector(&self) -> Result<ResolvedDetector<'_>, PassphotoError> {
        if let Some(detector) = self.detector.as_deref() {
            return Ok(ResolvedDetector::Configured(detector));
        }
        #[cfg(feature = "rustface")]
        {
            RustfaceDetector::default_model(self.detection_params).map(ResolvedDetector::Builtin)
        }
        #[cfg(not(feature = "rustface"))]
        {
            Err(PassphotoError::DetectorUnavailable(
                "no detector configured and the rustface backend is not compiled in".into(),
            ))
        }
    }
}

enum ResolvedDetector<'a> {
    Configured(&'a dyn FaceDetector),
    #[cfg(feature = "rustface")]
    Builtin(RustfaceDetector),
}

impl ResolvedDetector<'_> {
    fn as_detector(&self) -> &dyn FaceDetector {
        match self {
            ResolvedDetector::Configured(detector) => *detector,
            #[cfg(feature = "rustface")]
            ResolvedDetector::Builtin(detector) => detector,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoFaces;

    impl FaceDetector for NoFaces {
        fn detect(&self, _gray: &[u8], _width: u32, _height: u32) -> Vec<FaceBounds> {
            vec![]
        }
    }

    fn cropper() -> PassportCropper {
        PassportCropper::new().face_detector(Box::new(NoFaces))
    }

    #[test]
    fn negative_ratio_rejected_before_io() {
        let err = cropper()
            .extra_space_ratio(-0.1)
            .compose_one("missing.jpg", "out.jpg")
            .unwrap_err();
        assert!(matches!(err, PassphotoError::InvalidExpansionRatio(_)));
    }

    #[test]
    fn nan_ratio_rejected_before_io() {
        let err = cropper()
            .extra_space_ratio(f32::NAN)
            .compose_one("missing.jpg", "out.jpg")
            .unwrap_err();
        assert!(matches!(err, PassphotoError::InvalidExpansionRatio(_)));
    }

    #[test]
    fn zero_passport_size_rejected() {
        let err = cropper()
            .passport_size(0, 950)
            .compose_one("missing.jpg", "out.jpg")
            .unwrap_err();
        assert!(matches!(err, PassphotoError::InvalidTargetSize(0, 950)));
    }

    #[test]
    fn zero_detection_dimension_rejected() {
        let err = cropper()
            .max_detection_dimension(0)
            .compose_one("missing.jpg", "out.jpg")
            .unwrap_err();
        assert!(matches!(err, PassphotoError::InvalidMaxDimension));
    }

    #[test]
    fn missing_input_is_source_not_found() {
        let err = cropper()
            .compose_one("definitely/missing.jpg", "out.jpg")
            .unwrap_err();
        assert!(matches!(err, PassphotoError::SourceNotFound { .. }));
    }
}
