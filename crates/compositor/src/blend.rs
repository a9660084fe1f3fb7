//! Uniform alpha blending of two same-sized rasters.

use image::RgbImage;
use qrmark_common::error::{QrmarkError, QrmarkResult};

/// `round(alpha * overlay + (1 - alpha) * base)`, saturated to `u8`.
///
/// The weighted sum is taken in `f32` and rounded half up. OpenCV's
/// `addWeighted` rounds half to even instead, so exact `.5` sums (odd
/// totals at 50% opacity) can come out one level higher here.
pub fn blend_sample(overlay: u8, base: u8, alpha: f32) -> u8 {
    let value = alpha * overlay as f32 + (1.0 - alpha) * base as f32;
    value.round().clamp(0.0, 255.0) as u8
}

/// Blend `overlay` over `base` with the same weight on every pixel.
pub fn blend(overlay: &RgbImage, base: &RgbImage, alpha: f32) -> QrmarkResult<RgbImage> {
    if overlay.dimensions() != base.dimensions() {
        return Err(QrmarkError::processing(format!(
            "Cannot blend {}x{} overlay onto {}x{} base",
            overlay.width(),
            overlay.height(),
            base.width(),
            base.height()
        )));
    }

    let mut output = base.clone();
    for (dst, &src) in output.iter_mut().zip(overlay.iter()) {
        *dst = blend_sample(src, *dst, alpha);
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use proptest::prelude::*;

    #[test]
    fn half_blend_rounds_half_up() {
        assert_eq!(blend_sample(0, 201, 0.5), 101);
        assert_eq!(blend_sample(255, 100, 0.5), 178);
        assert_eq!(blend_sample(255, 255, 0.5), 255);
    }

    #[test]
    fn extreme_alphas_select_one_side() {
        assert_eq!(blend_sample(12, 240, 1.0), 12);
        assert_eq!(blend_sample(12, 240, 0.0), 240);
    }

    #[test]
    fn mismatched_sizes_are_rejected() {
        let a = RgbImage::new(4, 4);
        let b = RgbImage::new(4, 5);
        assert!(matches!(
            blend(&a, &b, 0.5),
            Err(QrmarkError::Processing { .. })
        ));
    }

    #[test]
    fn blend_applies_per_channel() {
        let overlay = RgbImage::from_pixel(2, 2, Rgb([255, 0, 100]));
        let base = RgbImage::from_pixel(2, 2, Rgb([1, 50, 100]));
        let out = blend(&overlay, &base, 0.5).unwrap();
        assert!(out.pixels().all(|p| *p == Rgb([128, 25, 100])));
    }

    proptest! {
        #[test]
        fn half_blend_is_symmetric(a in any::<u8>(), b in any::<u8>()) {
            prop_assert_eq!(blend_sample(a, b, 0.5), blend_sample(b, a, 0.5));
        }

        #[test]
        fn equal_inputs_are_fixed_points(v in any::<u8>(), alpha in 0.0f32..=1.0) {
            prop_assert_eq!(blend_sample(v, v, alpha), v);
        }
    }
}
