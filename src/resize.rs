use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};

/// Uniformly downscale so the longer side equals `max_dimension`, or return
/// the image unchanged if it already fits.
///
/// Run before detection to bound latency on very large inputs; the tradeoff
/// is detection accuracy, not correctness, since cropping happens in the
/// same coordinate space.
pub fn fit_within_bounds(image: DynamicImage, max_dimension: u32) -> DynamicImage {
    if image.width().max(image.height()) <= max_dimension {
        return image;
    }
    image.resize(max_dimension, max_dimension, FilterType::Lanczos3)
}

/// Scale so the result fits entirely within `target`, preserving the aspect
/// ratio.
///
/// At least one output dimension equals its target; the other may be
/// smaller. The output is never padded or stretched to the exact target
/// size.
pub fn resize_to_target(image: &DynamicImage, target: (u32, u32)) -> DynamicImage {
    image.resize(target.0, target.1, FilterType::Lanczos3)
}

/// Flatten any alpha channel by compositing onto a white background, so the
/// result can be written to formats without alpha support (JPEG).
pub(crate) fn flatten_alpha(image: &DynamicImage) -> RgbImage {
    let rgba = image.to_rgba8();
    let mut rgb = RgbImage::new(rgba.width(), rgba.height());
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = a as f32 / 255.0;
        let blend = |c: u8| (c as f32).mul_add(alpha, 255.0 * (1.0 - alpha)).round() as u8;
        rgb.put_pixel(x, y, image::Rgb([blend(r), blend(g), blend(b)]));
    }
    rgb
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn make_image(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::new(width, height))
    }

    #[test]
    fn small_image_passes_through_unchanged() {
        let resized = fit_within_bounds(make_image(800, 600), 1000);
        assert_eq!(resized.width(), 800);
        assert_eq!(resized.height(), 600);
    }

    #[test]
    fn exact_limit_passes_through_unchanged() {
        let resized = fit_within_bounds(make_image(1000, 400), 1000);
        assert_eq!(resized.width(), 1000);
        assert_eq!(resized.height(), 400);
    }

    #[test]
    fn large_landscape_constrained_by_width() {
        let resized = fit_within_bounds(make_image(2000, 1000), 1000);
        assert_eq!(resized.width(), 1000);
        assert_eq!(resized.height(), 500);
    }

    #[test]
    fn large_portrait_constrained_by_height() {
        let resized = fit_within_bounds(make_image(900, 3000), 1000);
        assert_eq!(resized.width(), 300);
        assert_eq!(resized.height(), 1000);
    }

    #[test]
    fn target_resize_never_exceeds_target() {
        let sources = [(80, 80), (62, 32), (400, 300), (1200, 1800)];
        for (w, h) in sources {
            let out = resize_to_target(&make_image(w, h), (900, 950));
            assert!(out.width() <= 900, "{w}x{h} → width {}", out.width());
            assert!(out.height() <= 950, "{w}x{h} → height {}", out.height());
            assert!(out.width() == 900 || out.height() == 950);
        }
    }

    #[test]
    fn target_resize_preserves_aspect_ratio() {
        let out = resize_to_target(&make_image(62, 32), (900, 950));
        let src_aspect = 62.0 / 32.0;
        let out_aspect = out.width() as f64 / out.height() as f64;
        // ±1 px rounding on the shorter side
        let tolerance = src_aspect / out.height() as f64;
        assert!((src_aspect - out_aspect).abs() <= tolerance);
    }

    #[test]
    fn square_crop_fills_target_width() {
        let out = resize_to_target(&make_image(80, 80), (900, 950));
        assert_eq!(out.width(), 900);
        assert_eq!(out.height(), 900);
    }

    #[test]
    fn flatten_makes_transparent_pixels_white() {
        let mut rgba = RgbaImage::new(1, 1);
        rgba.put_pixel(0, 0, image::Rgba([255, 0, 0, 0]));
        let rgb = flatten_alpha(&DynamicImage::ImageRgba8(rgba));
        assert_eq!(rgb.get_pixel(0, 0), &image::Rgb([255, 255, 255]));
    }

    #[test]
    fn flatten_keeps_opaque_pixels() {
        let mut rgba = RgbaImage::new(1, 1);
        rgba.put_pixel(0, 0, image::Rgba([100, 150, 200, 255]));
        let rgb = flatten_alpha(&DynamicImage::ImageRgba8(rgba));
        assert_eq!(rgb.get_pixel(0, 0), &image::Rgb([100, 150, 200]));
    }
}
