use crate::error::PassphotoError;
use crate::face_detector::FaceBounds;

/// Crop rectangle within the source image, clipped to its bounds.
///
/// `left < right` and `top < bottom` always hold for a value produced by
/// [`expand_box`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    /// Left edge (inclusive, pixels).
    pub left: u32,
    /// Top edge (inclusive, pixels).
    pub top: u32,
    /// Right edge (exclusive, pixels).
    pub right: u32,
    /// Bottom edge (exclusive, pixels).
    pub bottom: u32,
}

impl CropRect {
    /// Width of the rectangle in pixels.
    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    /// Height of the rectangle in pixels.
    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }
}

/// Expand a face box by `ratio` on every side and clip to the image bounds.
///
/// The margin is `floor(width × ratio)` horizontally and
/// `floor(height × ratio)` vertically. With `ratio` 0 the result is exactly
/// the face box. `ratio` must be >= 0; the pipeline validates it at
/// configuration time.
///
/// Returns [`PassphotoError::InvalidBoundingBox`] when the clipped
/// rectangle has no area, which can only happen with a zero-size input box
/// or a box entirely outside the image.
pub fn expand_box(
    face: &FaceBounds,
    image_width: u32,
    image_height: u32,
    ratio: f32,
) -> Result<CropRect, PassphotoError> {
    let extra_w = (face.width as f64 * ratio as f64).floor() as u32;
    let extra_h = (face.height as f64 * ratio as f64).floor() as u32;

    let left = face.x.saturating_sub(extra_w);
    let top = face.y.saturating_sub(extra_h);
    let right = face
        .x
        .saturating_add(face.width)
        .saturating_add(extra_w)
        .min(image_width);
    let bottom = face
        .y
        .saturating_add(face.height)
        .saturating_add(extra_h)
        .min(image_height);

    if left >= right || top >= bottom {
        return Err(PassphotoError::InvalidBoundingBox {
            x: face.x,
            y: face.y,
        });
    }

    Ok(CropRect {
        left,
        top,
        right,
        bottom,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face(x: u32, y: u32, width: u32, height: u32) -> FaceBounds {
        FaceBounds {
            x,
            y,
            width,
            height,
            confidence: 1.0,
        }
    }

    #[test]
    fn zero_ratio_returns_original_box() {
        let rect = expand_box(&face(100, 100, 50, 50), 1000, 1000, 0.0).unwrap();
        assert_eq!(
            rect,
            CropRect {
                left: 100,
                top: 100,
                right: 150,
                bottom: 150,
            }
        );
    }

    #[test]
    fn expands_symmetrically_inside_image() {
        // 50 × 0.3 = 15 extra on each side
        let rect = expand_box(&face(100, 100, 50, 50), 1000, 1000, 0.3).unwrap();
        assert_eq!(
            rect,
            CropRect {
                left: 85,
                top: 85,
                right: 165,
                bottom: 165,
            }
        );
    }

    #[test]
    fn margin_is_floored() {
        // 33 × 0.3 = 9.9 → 9
        let rect = expand_box(&face(50, 50, 33, 33), 1000, 1000, 0.3).unwrap();
        assert_eq!(rect.left, 41);
        assert_eq!(rect.right, 92);
    }

    #[test]
    fn clamps_at_top_left_corner() {
        let rect = expand_box(&face(5, 5, 60, 60), 400, 400, 0.3).unwrap();
        assert_eq!(rect.left, 0);
        assert_eq!(rect.top, 0);
        assert_eq!(rect.right, 83); // 5 + 60 + 18
        assert_eq!(rect.bottom, 83);
    }

    #[test]
    fn clamps_at_bottom_right_corner() {
        let rect = expand_box(&face(350, 360, 40, 40), 400, 400, 0.5).unwrap();
        assert_eq!(rect.left, 330);
        assert_eq!(rect.top, 340);
        assert_eq!(rect.right, 400);
        assert_eq!(rect.bottom, 400);
    }

    #[test]
    fn always_within_image_bounds() {
        let boxes = [
            face(0, 0, 10, 10),
            face(390, 390, 10, 10),
            face(100, 350, 200, 50),
            face(1, 1, 398, 398),
        ];
        for b in &boxes {
            for ratio in [0.0, 0.1, 0.3, 1.0, 5.0] {
                let rect = expand_box(b, 400, 400, ratio).unwrap();
                assert!(rect.right <= 400);
                assert!(rect.bottom <= 400);
                assert!(rect.left < rect.right);
                assert!(rect.top < rect.bottom);
            }
        }
    }

    #[test]
    fn zero_size_box_is_rejected() {
        let err = expand_box(&face(100, 100, 0, 0), 400, 400, 0.3).unwrap_err();
        assert!(matches!(
            err,
            PassphotoError::InvalidBoundingBox { x: 100, y: 100 }
        ));
    }

    #[test]
    fn box_outside_image_is_rejected() {
        assert!(expand_box(&face(500, 500, 20, 20), 400, 400, 0.0).is_err());
    }
}
