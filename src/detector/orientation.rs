//! Skew removal from long straight edges
//!
//! Two independent passes: the vertical pass levels near-vertical lines
//! using the image width as the length reference, the horizontal pass
//! levels near-horizontal lines using the image height. Each pass averages
//! the angles of the qualifying segments and rotates the whole image about
//! its center. An angle below [`SNAP_DEGREES`] counts as zero and leaves the
//! image untouched.
use image::{Rgba, RgbImage, RgbaImage};
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::geometric_transformations::{Interpolation, rotate_about_center};
use log::debug;

use crate::utils::grayscale::rgb_to_gray;
use crate::utils::lines::{Segment, SegmentOptions, extract_segments};

/// Averaged angles smaller than this (degrees) are treated as level
pub const SNAP_DEGREES: f64 = 0.2;

/// Sigma matching a 5x5 Gaussian kernel
pub(crate) const BLUR_SIGMA: f32 = 1.1;
const CANNY_LOW: f32 = 50.0;
const CANNY_HIGH: f32 = 150.0;

/// Line family a pass measures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Segments taller than they are wide
    Vertical,
    /// Segments wider than they are tall
    Horizontal,
}

/// Removes vertical then horizontal skew
pub struct OrientationCorrector;

impl OrientationCorrector {
    /// Run both passes, each on the output of the previous one
    pub fn correct(image: RgbImage, min_line_pct: f64) -> RgbImage {
        let vertical = Self::measure(&image, Axis::Vertical, min_line_pct);
        debug!("vertical skew: {vertical:.3} deg");
        let image = rotate(image, vertical);

        let horizontal = Self::measure(&image, Axis::Horizontal, min_line_pct);
        debug!("horizontal skew: {horizontal:.3} deg");
        rotate(image, horizontal)
    }

    /// Skew angle of one pass, in degrees (counter-clockwise positive)
    pub fn measure(image: &RgbImage, axis: Axis, min_line_pct: f64) -> f64 {
        let reference = match axis {
            Axis::Vertical => image.width(),
            Axis::Horizontal => image.height(),
        };
        let min_length = min_line_pct / 100.0 * reference as f64;
        let segments = extract_segments(&edge_map(image), &SegmentOptions::default());
        skew_angle(&segments, axis, min_length)
    }
}

/// Canny edges of the blurred grayscale image
pub fn edge_map(image: &RgbImage) -> image::GrayImage {
    let gray = rgb_to_gray(image);
    let blurred = gaussian_blur_f32(&gray, BLUR_SIGMA);
    canny(&blurred, CANNY_LOW, CANNY_HIGH)
}

/// Average angle of the segments that qualify for `axis`
///
/// Vertical angles are folded so that a perfectly vertical line reads 0.
/// Returns 0 when no segment qualifies or when the average is below
/// [`SNAP_DEGREES`].
pub fn skew_angle(segments: &[Segment], axis: Axis, min_length: f64) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;

    for s in segments {
        let (dx, dy) = (s.dx().abs(), s.dy().abs());
        let oriented = match axis {
            Axis::Vertical => dy > dx,
            Axis::Horizontal => dy < dx,
        };
        if !oriented || s.length() < min_length {
            continue;
        }

        let raw = (s.dy() as f64).atan2(s.dx() as f64).to_degrees();
        sum += match axis {
            Axis::Vertical if raw > 0.0 => raw - 90.0,
            Axis::Vertical => raw + 90.0,
            Axis::Horizontal => raw,
        };
        count += 1;
    }

    if count == 0 {
        return 0.0;
    }
    let angle = sum / count as f64;
    if angle.abs() < SNAP_DEGREES { 0.0 } else { angle }
}

/// Rotate about the center by `angle_deg` (counter-clockwise positive)
///
/// Output pixels with no source sample keep the input pixel. A zero angle
/// returns the input as is.
pub fn rotate(image: RgbImage, angle_deg: f64) -> RgbImage {
    if angle_deg == 0.0 {
        return image;
    }

    let (w, h) = image.dimensions();
    let mut rgba = RgbaImage::new(w, h);
    for (src, dst) in image.pixels().zip(rgba.pixels_mut()) {
        *dst = Rgba([src[0], src[1], src[2], 255]);
    }

    // imageproc rotates clockwise for positive theta
    let theta = -(angle_deg.to_radians() as f32);
    let rotated = rotate_about_center(&rgba, theta, Interpolation::Bilinear, Rgba([0, 0, 0, 0]));

    let mut out = image;
    for (dst, src) in out.pixels_mut().zip(rotated.pixels()) {
        let alpha = src[3] as u32;
        if alpha == 0 {
            continue;
        }
        for c in 0..3 {
            // Undo the blend with the transparent fill along the border
            dst[c] = ((src[c] as u32 * 255 + alpha / 2) / alpha).min(255) as u8;
        }
    }
    out
}
