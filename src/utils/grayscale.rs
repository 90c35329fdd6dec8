//! Convert RGB image to grayscale
//! Y = 0.299*R + 0.587*G + 0.114*B
//! Uses fixed-point integer arithmetic: Y = (4899*R + 9617*G + 1868*B + 2^13) >> 14
//!
//! The coefficients sum to 2^14 so pure white stays at 255.
use image::{GrayImage, RgbImage};

/// Coefficients for grayscale conversion, scaled by 2^14
const COEF_R: u32 = 4899;
const COEF_G: u32 = 9617;
const COEF_B: u32 = 1868;
const SHIFT: u32 = 14;
const ROUND: u32 = 1 << (SHIFT - 1);

/// Luma of a single RGB triple
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    let lum = (COEF_R * r as u32 + COEF_G * g as u32 + COEF_B * b as u32 + ROUND) >> SHIFT;
    lum.min(255) as u8
}

/// Convert an RGB image to grayscale
pub fn rgb_to_gray(image: &RgbImage) -> GrayImage {
    let (width, height) = image.dimensions();
    let mut gray = Vec::with_capacity(width as usize * height as usize);

    // 4x unrolled over pixel triples
    let raw = image.as_raw();
    let mut chunks = raw.chunks_exact(12);
    for c in &mut chunks {
        gray.push(luma(c[0], c[1], c[2]));
        gray.push(luma(c[3], c[4], c[5]));
        gray.push(luma(c[6], c[7], c[8]));
        gray.push(luma(c[9], c[10], c[11]));
    }
    for px in chunks.remainder().chunks_exact(3) {
        gray.push(luma(px[0], px[1], px[2]));
    }

    // Buffer length always equals width * height
    GrayImage::from_raw(width, height, gray).unwrap_or_else(|| GrayImage::new(width, height))
}
