use std::ops::Range;

use super::point::PointI;

/// Axis-aligned integer rectangle.
///
/// Width and height count pixels, so a box spanning columns 10..=19 has
/// `width == 10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BoundingBox {
    /// Left edge
    pub x: i32,
    /// Top edge
    pub y: i32,
    /// Width in pixels
    pub width: i32,
    /// Height in pixels
    pub height: i32,
}

impl BoundingBox {
    /// Create a new box
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Smallest box covering every point, `None` for an empty slice
    pub fn enclosing(points: &[PointI]) -> Option<Self> {
        let first = points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Self::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
    }

    /// Exclusive right edge
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Exclusive bottom edge
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Width over height
    pub fn aspect_ratio(&self) -> f64 {
        if self.height == 0 {
            return 0.0;
        }
        self.width as f64 / self.height as f64
    }

    /// Pixel area
    pub fn area(&self) -> i64 {
        self.width as i64 * self.height as i64
    }

    /// Shift by (dx, dy)
    pub fn translate(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Smallest box covering both boxes
    pub fn union(&self, other: &BoundingBox) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Self::new(x, y, right - x, bottom - y)
    }

    /// Both the sizes and the origins differ by less than `tolerance` pixels
    pub fn is_similar(&self, other: &BoundingBox, tolerance: i32) -> bool {
        let same_size = (self.width - other.width).abs() < tolerance
            && (self.height - other.height).abs() < tolerance;
        let same_place =
            (self.x - other.x).abs() < tolerance && (self.y - other.y).abs() < tolerance;
        same_size && same_place
    }

    /// Whether the box lies fully inside a `width` x `height` canvas
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.width > 0
            && self.height > 0
            && self.right() as i64 <= width as i64
            && self.bottom() as i64 <= height as i64
    }

    /// Intersection with a `width` x `height` canvas, `None` when they do not overlap
    pub fn clamp_to(&self, width: u32, height: u32) -> Option<Self> {
        let x = self.x.max(0);
        let y = self.y.max(0);
        let right = (self.right() as i64).min(width as i64) as i32;
        let bottom = (self.bottom() as i64).min(height as i64) as i32;
        if right <= x || bottom <= y {
            return None;
        }
        Some(Self::new(x, y, right - x, bottom - y))
    }

    /// Center of the box, truncated
    pub fn center(&self) -> PointI {
        PointI::new(self.x + self.width / 2, self.y + self.height / 2)
    }
}

/// Answer-sheet section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Part {
    /// 40 multiple-choice questions (A-D)
    Part1,
    /// 8 questions of four yes/no statements
    Part2,
    /// 6 numeric-code questions
    Part3,
}

impl Part {
    /// All parts in sheet order
    pub const ALL: [Part; 3] = [Part::Part1, Part::Part2, Part::Part3];

    /// Block indices owned by this part
    pub fn zone(&self) -> Range<usize> {
        match self {
            Part::Part1 => 0..4,
            Part::Part2 => 4..8,
            Part::Part3 => 8..14,
        }
    }

    /// Key used for this part in answer documents
    pub fn key(&self) -> &'static str {
        match self {
            Part::Part1 => "1",
            Part::Part2 => "2",
            Part::Part3 => "3",
        }
    }

    /// Part that owns a block index
    pub fn of_block(index: usize) -> Option<Part> {
        Self::ALL.into_iter().find(|p| p.zone().contains(&index))
    }
}

impl std::fmt::Display for Part {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "part {}", self.key())
    }
}

/// One located answer region of the sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    /// Raster-order position, 0-13
    pub index: usize,
    /// Region in rectified image coordinates
    pub bounds: BoundingBox,
}

impl Block {
    /// Create a new block
    pub fn new(index: usize, bounds: BoundingBox) -> Self {
        Self { index, bounds }
    }

    /// Position of this block inside its part (0-based)
    pub fn index_in_part(&self) -> usize {
        match Part::of_block(self.index) {
            Some(part) => self.index - part.zone().start,
            None => self.index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enclosing_matches_pixel_extent() {
        let points = [PointI::new(10, 5), PointI::new(19, 5), PointI::new(14, 24)];
        let bbox = BoundingBox::enclosing(&points).unwrap();
        assert_eq!(bbox, BoundingBox::new(10, 5, 10, 20));
        assert!(BoundingBox::enclosing(&[]).is_none());
    }

    #[test]
    fn test_union_and_similarity() {
        let a = BoundingBox::new(100, 100, 50, 120);
        let b = BoundingBox::new(104, 97, 48, 126);
        assert!(a.is_similar(&b, 10));
        assert_eq!(a.union(&b), BoundingBox::new(100, 97, 52, 126));

        let far = BoundingBox::new(100, 100, 61, 120);
        assert!(!a.is_similar(&far, 10));
    }

    #[test]
    fn test_clamp_and_fit() {
        let bbox = BoundingBox::new(-5, 10, 30, 30);
        assert!(!bbox.fits_within(100, 100));
        assert_eq!(bbox.clamp_to(100, 30), Some(BoundingBox::new(0, 10, 25, 20)));
        assert_eq!(BoundingBox::new(200, 0, 5, 5).clamp_to(100, 100), None);
    }

    #[test]
    fn test_part_zones() {
        assert_eq!(Part::of_block(0), Some(Part::Part1));
        assert_eq!(Part::of_block(7), Some(Part::Part2));
        assert_eq!(Part::of_block(13), Some(Part::Part3));
        assert_eq!(Part::of_block(14), None);
        assert_eq!(Block::new(9, BoundingBox::default()).index_in_part(), 1);
    }
}
