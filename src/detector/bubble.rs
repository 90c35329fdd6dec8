//! Bubble mark detection inside one grid cell
use std::ops::RangeInclusive;

use image::{GrayImage, RgbImage};

use crate::detector::blocks::{THRESH_BLOCK, THRESH_C};
use crate::models::{Mark, Point, PointI};
use crate::utils::binarization::{adaptive_threshold_inv, count_nonzero};
use crate::utils::contours::{self, Retrieval};
use crate::utils::geometry::min_enclosing_circle;
use crate::utils::grayscale::rgb_to_gray;

/// Contours smaller than this are specks, not bubbles
pub const MIN_BUBBLE_AREA: f64 = 30.0;
/// Fill fraction of the bounding box above which a bubble counts as filled
pub const FILL_RATIO: f64 = 0.5;
/// Accepted bounding-box aspect; both ends excluded
const BUBBLE_ASPECT: RangeInclusive<f64> = 0.5..=1.5;

/// Reads a cell for a bubble
pub struct BubbleDetector;

impl BubbleDetector {
    /// Read an RGB cell
    ///
    /// `legacy_threshold` belonged to a global-threshold method and is
    /// ignored; the mask is always adaptive.
    pub fn detect(region: &RgbImage, _legacy_threshold: u8) -> Mark {
        Self::detect_gray(&rgb_to_gray(region))
    }

    /// Read an already grayscale cell
    ///
    /// The first outer contour (in tracing order) that is large enough and
    /// roughly square decides the result.
    pub fn detect_gray(gray: &GrayImage) -> Mark {
        let mask = adaptive_threshold_inv(gray, THRESH_BLOCK, THRESH_C);

        for contour in contours::find(&mask, Retrieval::External) {
            if contour.area() < MIN_BUBBLE_AREA {
                continue;
            }
            let bounds = contour.bounding_box();
            let aspect = bounds.aspect_ratio();
            if !is_round_aspect(aspect) {
                continue;
            }

            let points: Vec<Point> = contour
                .points
                .iter()
                .map(|p| Point::new(p.x as f32, p.y as f32))
                .collect();
            let center = match min_enclosing_circle(&points) {
                Some((center, _)) => center.truncate(),
                None => bounds.center(),
            };

            let filled = count_nonzero(&mask, &bounds) as f64 / bounds.area() as f64;
            return if filled > FILL_RATIO {
                Mark::Filled(center)
            } else {
                Mark::Unfilled(center)
            };
        }
        Mark::NotFound
    }
}

fn is_round_aspect(aspect: f64) -> bool {
    aspect > *BUBBLE_ASPECT.start() && aspect < *BUBBLE_ASPECT.end()
}

/// Region-relative point of a mark, or the cell center when nothing was found
pub fn cell_point(mark: &Mark, cell_width: i32, cell_height: i32) -> PointI {
    mark.point()
        .unwrap_or_else(|| PointI::new(cell_width / 2, cell_height / 2))
}
