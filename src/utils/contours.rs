//! Contour retrieval and per-contour shape measurements
use image::GrayImage;
use imageproc::contours::{BorderType, find_contours};
use imageproc::point::Point;

use crate::models::{BoundingBox, PointI};
use crate::utils::geometry::{approximate_closed_polygon, polygon_area};

/// Which borders to return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retrieval {
    /// Only outer borders that are not nested inside another shape
    External,
    /// Every outer and hole border at any nesting depth
    Tree,
}

/// One traced border
#[derive(Debug, Clone)]
pub struct Contour {
    /// Border pixels in tracing order
    pub points: Vec<Point<i32>>,
}

impl Contour {
    /// Enclosed polygon area (shoelace over the border pixels)
    pub fn area(&self) -> f64 {
        polygon_area(&self.points)
    }

    /// Closed border length
    pub fn perimeter(&self) -> f64 {
        if self.points.len() < 2 {
            return 0.0;
        }
        imageproc::geometry::arc_length(&self.points, true)
    }

    /// Pixel-extent bounding box
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::enclosing(&self.pixel_points()).unwrap_or_default()
    }

    /// Douglas-Peucker approximation with epsilon = `fraction` of the perimeter
    pub fn approximate(&self, fraction: f64) -> Vec<Point<i32>> {
        approximate_closed_polygon(&self.points, fraction * self.perimeter())
    }

    /// Border pixels as crate points
    pub fn pixel_points(&self) -> Vec<PointI> {
        self.points.iter().map(|p| PointI::new(p.x, p.y)).collect()
    }
}

/// Trace the borders of the non-zero regions of `mask`
pub fn find(mask: &GrayImage, mode: Retrieval) -> Vec<Contour> {
    find_contours::<i32>(mask)
        .into_iter()
        .filter(|c| match mode {
            Retrieval::External => c.border_type == BorderType::Outer && c.parent.is_none(),
            Retrieval::Tree => true,
        })
        .filter(|c| !c.points.is_empty())
        .map(|c| Contour { points: c.points })
        .collect()
}
