//! QR preparation: thresholding, scaling and channel promotion.

use image::imageops::{self, FilterType};
use image::{GrayImage, Luma, Rgb, RgbImage};

/// Resampling filter used to scale the binarized QR code (bilinear).
pub const RESIZE_FILTER: FilterType = FilterType::Triangle;

/// Map every sample strictly above `threshold` to 255 and the rest to 0.
pub fn binarize(qr: &GrayImage, threshold: u8) -> GrayImage {
    let mut binary = qr.clone();
    for sample in binary.iter_mut() {
        *sample = if *sample > threshold { 255 } else { 0 };
    }
    binary
}

/// Scale to a `size × size` square, stretching non-square input.
pub fn resize_square(binary: &GrayImage, size: u32) -> GrayImage {
    imageops::resize(binary, size, size, RESIZE_FILTER)
}

/// Replicate the gray value into all three color channels.
pub fn colorize(gray: &GrayImage) -> RgbImage {
    RgbImage::from_fn(gray.width(), gray.height(), |x, y| {
        let Luma([v]) = *gray.get_pixel(x, y);
        Rgb([v, v, v])
    })
}
