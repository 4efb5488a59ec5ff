use crate::error::PassphotoError;

/// Bounding box of a detected face within an image.
///
/// Coordinates are pixels in the image the detector was run on, origin
/// top-left. A well-formed box lies entirely within that image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceBounds {
    /// X coordinate of the top-left corner (pixels).
    pub x: u32,
    /// Y coordinate of the top-left corner (pixels).
    pub y: u32,
    /// Width of the bounding box (pixels).
    pub width: u32,
    /// Height of the bounding box (pixels).
    pub height: u32,
    /// Detection confidence score.
    pub confidence: f64,
}

/// Sensitivity knobs forwarded to the detection backend.
///
/// These control how eagerly the backend reports faces; they are opaque to
/// the cropping pipeline itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionParams {
    /// Image pyramid growth per scan step. Must be >= 1.0.
    pub scale_factor: f32,
    /// How much cascade agreement a detection needs. Must be >= 1.
    pub min_neighbors: u32,
    /// Smallest face to report, as (width, height) in pixels.
    pub min_size: (u32, u32),
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            scale_factor: 1.1,
            min_neighbors: 5,
            min_size: (40, 30),
        }
    }
}

impl DetectionParams {
    pub(crate) fn validate(&self) -> Result<(), PassphotoError> {
        if !(self.scale_factor >= 1.0) {
            return Err(PassphotoError::InvalidDetectionParams(format!(
                "scale factor must be >= 1.0, got {}",
                self.scale_factor
            )));
        }
        if self.min_neighbors < 1 {
            return Err(PassphotoError::InvalidDetectionParams(
                "min neighbors must be >= 1".into(),
            ));
        }
        Ok(())
    }
}

/// Pluggable face detection backend.
///
/// Implement this trait to provide a custom detector (cascade, ONNX, etc.)
/// and pass it to [`crate::PassportCropper::face_detector`]. Detection must
/// be pure over the pixel data; an empty result is a valid outcome, and the
/// caller decides what to do with it.
pub trait FaceDetector: Send + Sync {
    /// Detect faces in a row-major grayscale buffer of `width` × `height`
    /// bytes, returned in the backend's own scan order.
    fn detect(&self, gray: &[u8], width: u32, height: u32) -> Vec<FaceBounds>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_are_valid() {
        assert!(DetectionParams::default().validate().is_ok());
    }

    #[test]
    fn scale_factor_below_one_rejected() {
        let params = DetectionParams {
            scale_factor: 0.9,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn scale_factor_nan_rejected() {
        let params = DetectionParams {
            scale_factor: f32::NAN,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn zero_min_neighbors_rejected() {
        let params = DetectionParams {
            min_neighbors: 0,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }
}
