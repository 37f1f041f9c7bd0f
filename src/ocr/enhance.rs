//! Page image pre-pass applied before recognition.
//!
//! Grayscale, then contrast, then sharpness. Both enhancement steps blend the
//! image away from a degenerate version of itself by a fixed factor: a flat
//! image at the mean intensity for contrast, a 3x3 smoothed copy for sharpness.

use image::{DynamicImage, GrayImage, Luma};

pub const DEFAULT_CONTRAST_FACTOR: f32 = 2.0;
pub const DEFAULT_SHARPNESS_FACTOR: f32 = 2.0;

/// Smoothing kernel used as the sharpness baseline, normalised by 13.
const SMOOTH_KERNEL: [[u32; 3]; 3] = [[1, 1, 1], [1, 5, 1], [1, 1, 1]];
const SMOOTH_DIVISOR: u32 = 13;

/// Enhancement factors. `1.0` leaves the image unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Enhancement {
    pub contrast: f32,
    pub sharpness: f32,
}

impl Default for Enhancement {
    fn default() -> Self {
        Self {
            contrast: DEFAULT_CONTRAST_FACTOR,
            sharpness: DEFAULT_SHARPNESS_FACTOR,
        }
    }
}

impl Enhancement {
    /// Run the full pre-pass on a decoded page image.
    pub fn apply(&self, page: &DynamicImage) -> GrayImage {
        let gray = page.to_luma8();
        let gray = adjust_contrast(&gray, self.contrast);
        adjust_sharpness(&gray, self.sharpness)
    }
}

fn blend(degenerate: f32, original: f32, factor: f32) -> u8 {
    (degenerate + factor * (original - degenerate))
        .round()
        .clamp(0.0, 255.0) as u8
}

/// Stretch intensities away from the rounded mean.
pub fn adjust_contrast(img: &GrayImage, factor: f32) -> GrayImage {
    let pixel_count = (img.width() as u64) * (img.height() as u64);
    if pixel_count == 0 {
        return img.clone();
    }

    let sum: u64 = img.pixels().map(|p| p[0] as u64).sum();
    let mean = (sum as f64 / pixel_count as f64).round() as f32;

    let mut out = img.clone();
    for pixel in out.pixels_mut() {
        pixel[0] = blend(mean, pixel[0] as f32, factor);
    }
    out
}

/// Amplify the difference between each pixel and its smoothed neighbourhood.
///
/// Border pixels have no full neighbourhood and are copied unchanged.
pub fn adjust_sharpness(img: &GrayImage, factor: f32) -> GrayImage {
    let (width, height) = img.dimensions();
    let mut out = img.clone();
    if width < 3 || height < 3 {
        return out;
    }

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let mut acc = 0u32;
            for (ky, row) in SMOOTH_KERNEL.iter().enumerate() {
                for (kx, weight) in row.iter().enumerate() {
                    let px = img.get_pixel(x + kx as u32 - 1, y + ky as u32 - 1)[0] as u32;
                    acc += px * weight;
                }
            }
            let smoothed = ((acc + SMOOTH_DIVISOR / 2) / SMOOTH_DIVISOR) as f32;
            let original = img.get_pixel(x, y)[0] as f32;
            out.put_pixel(x, y, Luma([blend(smoothed, original, factor)]));
        }
    }
    out
}
