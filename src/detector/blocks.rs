//! Block location
//!
//! Finds the 14 answer regions of a height-normalized sheet. Part 1 and
//! Part 2 blocks come straight out of the border mask. Part 3 is printed as
//! one framed container holding six code columns, so the container is cut
//! out and segmented again with its own pipeline.
use std::ops::RangeInclusive;

use image::{GrayImage, Luma, RgbImage};
use imageproc::distance_transform::Norm;
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::morphology::{self, Mask, grayscale_close, grayscale_dilate};
use imageproc::point::Point;
use log::debug;

use crate::detector::orientation::BLUR_SIGMA;
use crate::error::ScoreError;
use crate::models::{Block, BoundingBox, PointI};
use crate::utils::binarization::adaptive_threshold_inv;
use crate::utils::contours::{self, Contour, Retrieval};
use crate::utils::contrast::Clahe;
use crate::utils::grayscale::rgb_to_gray;

/// Blocks a valid sheet must yield
pub const EXPECTED_BLOCKS: usize = 14;
/// Rows of boxes whose tops differ by less than a band share a row
pub const BAND_HEIGHT: i32 = 60;

/// Adaptive threshold neighbourhood shared by every mask in the crate
pub(crate) const THRESH_BLOCK: u32 = 21;
/// Adaptive threshold offset shared by every mask in the crate
pub(crate) const THRESH_C: i32 = 15;

const MIN_BLOCK_AREA: f64 = 1000.0;
const POLY_EPSILON: f64 = 0.04;
const CONTAINER_INDEX: usize = 8;
const CONTAINER_PAD: i32 = 10;
const COLUMN_AREA: RangeInclusive<f64> = 20_000.0..=50_000.0;
const COLUMN_ASPECT: RangeInclusive<f64> = 0.35..=0.45;
const MERGE_TOLERANCE: i32 = 10;
const BLOCK_ASPECT: RangeInclusive<f64> = 0.35..=1.5;

/// Raster sort key: band of the top edge first, then the left edge
pub fn raster_key(bounds: &BoundingBox, image_width: u32) -> i64 {
    let band = (bounds.y / BAND_HEIGHT * BAND_HEIGHT) as i64;
    band * image_width as i64 + bounds.x as i64
}

/// Fold near-duplicate boxes into their union
///
/// Each box merges into the first accumulated box it is similar to, or is
/// appended when there is none.
pub fn merge_similar(boxes: &[BoundingBox], tolerance: i32) -> Vec<BoundingBox> {
    boxes.iter().fold(Vec::new(), |mut merged: Vec<BoundingBox>, b| {
        match merged.iter_mut().find(|m| m.is_similar(b, tolerance)) {
            Some(existing) => *existing = existing.union(b),
            None => merged.push(*b),
        }
        merged
    })
}

/// Locates the answer blocks of a normalized sheet
pub struct BlockLocator;

impl BlockLocator {
    /// Number the boxes found by [`find_boxes`](Self::find_boxes) as the 14
    /// raster-ordered blocks, or `BlockCount` with how many there were
    pub fn locate(boxes: &[BoundingBox]) -> Result<Vec<Block>, ScoreError> {
        if boxes.len() != EXPECTED_BLOCKS {
            return Err(ScoreError::BlockCount { found: boxes.len() });
        }
        Ok(boxes
            .iter()
            .enumerate()
            .map(|(i, b)| Block::new(i, *b))
            .collect())
    }

    /// Every candidate box, in raster order
    ///
    /// Once the Part 3 container is present it is split into its columns and
    /// the whole list is filtered by aspect ratio. With fewer candidates the
    /// coarse boxes are returned unfiltered.
    pub fn find_boxes(image: &RgbImage) -> Vec<BoundingBox> {
        let mask = Self::border_mask(image);
        let mut boxes = Self::coarse_boxes(&mask);
        debug!("coarse block candidates: {}", boxes.len());

        if boxes.len() > CONTAINER_INDEX {
            let columns = Self::split_container(image, &boxes[CONTAINER_INDEX]);
            debug!("part 3 columns: {}", columns.len());
            boxes.splice(CONTAINER_INDEX..=CONTAINER_INDEX, columns);
            boxes.retain(|b| BLOCK_ASPECT.contains(&b.aspect_ratio()));
            debug!("blocks after aspect filter: {}", boxes.len());
        }
        boxes
    }

    /// Binary mask of the printed block frames
    pub fn border_mask(image: &RgbImage) -> GrayImage {
        let gray = rgb_to_gray(image);
        let blurred = gaussian_blur_f32(&gray, BLUR_SIGMA);
        let equalized = Clahe::default().apply(&blurred);
        let binary = adaptive_threshold_inv(&equalized, THRESH_BLOCK, THRESH_C);
        let kernel = frame_kernel();
        let dilated = grayscale_dilate(&binary, &kernel);
        grayscale_close(&dilated, &kernel)
    }

    fn coarse_boxes(mask: &GrayImage) -> Vec<BoundingBox> {
        let header_limit = (mask.height() * 2 / 11) as i32;
        sorted_contours(mask, Retrieval::External)
            .iter()
            .filter(|c| c.area() >= MIN_BLOCK_AREA)
            .filter_map(|c| quadrilateral_bounds(c))
            .filter(|b| b.y > header_limit)
            .collect()
    }

    /// Six column boxes of the Part 3 container, in image coordinates
    fn split_container(image: &RgbImage, container: &BoundingBox) -> Vec<BoundingBox> {
        let padded = BoundingBox::new(
            container.x - CONTAINER_PAD,
            container.y - CONTAINER_PAD,
            container.width + 2 * CONTAINER_PAD,
            container.height + 2 * CONTAINER_PAD,
        );
        let Some(roi) = padded.clamp_to(image.width(), image.height()) else {
            return Vec::new();
        };
        let crop = image::imageops::crop_imm(
            image,
            roi.x as u32,
            roi.y as u32,
            roi.width as u32,
            roi.height as u32,
        )
        .to_image();

        let edges = Self::column_edges(&crop);
        let candidates: Vec<BoundingBox> = sorted_contours(&edges, Retrieval::Tree)
            .iter()
            .filter(|c| COLUMN_AREA.contains(&c.area()))
            .filter_map(|c| quadrilateral_bounds(c))
            .filter(|b| COLUMN_ASPECT.contains(&b.aspect_ratio()))
            .collect();

        merge_similar(&candidates, MERGE_TOLERANCE)
            .into_iter()
            .map(|b| b.translate(roi.x, roi.y))
            .collect()
    }

    /// Edge map of the Part 3 container crop
    pub fn column_edges(crop: &RgbImage) -> GrayImage {
        let gray = rgb_to_gray(crop);
        let blurred = gaussian_blur_f32(&gray, BLUR_SIGMA);
        let binary = adaptive_threshold_inv(&blurred, THRESH_BLOCK, THRESH_C);
        let dilated = morphology::dilate(&binary, Norm::LInf, 1);
        let closed = morphology::close(&dilated, Norm::LInf, 1);
        canny(&closed, 50.0, 150.0)
    }
}

/// 2x2 square anchored at its bottom-right pixel, so dilation grows shapes down and right
fn frame_kernel() -> Mask {
    Mask::from_image(&GrayImage::from_pixel(2, 2, Luma([255])), 1, 1)
}

fn sorted_contours(mask: &GrayImage, mode: Retrieval) -> Vec<Contour> {
    let mut found = contours::find(mask, mode);
    found.sort_by_key(|c| raster_key(&c.bounding_box(), mask.width()));
    found
}

/// Bounds of the contour's polygon approximation when it has four corners
fn quadrilateral_bounds(contour: &Contour) -> Option<BoundingBox> {
    let approx = contour.approximate(POLY_EPSILON);
    if approx.len() != 4 {
        return None;
    }
    let corners: Vec<PointI> = approx.iter().map(|p: &Point<i32>| PointI::new(p.x, p.y)).collect();
    BoundingBox::enclosing(&corners)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use imageproc::drawing::draw_hollow_rect_mut;
    use imageproc::rect::Rect;

    #[test]
    fn test_raster_key_bands_rows() {
        let width = 1000;
        let a = BoundingBox::new(500, 262, 10, 10);
        let b = BoundingBox::new(40, 290, 10, 10);
        let c = BoundingBox::new(10, 300, 10, 10);
        // a and b share the 240 band, c starts the next one
        assert!(raster_key(&b, width) < raster_key(&a, width));
        assert!(raster_key(&a, width) < raster_key(&c, width));
    }

    #[test]
    fn test_merge_similar_unions_near_duplicates() {
        let boxes = [
            BoundingBox::new(100, 100, 96, 240),
            BoundingBox::new(300, 100, 96, 240),
            BoundingBox::new(103, 98, 92, 245),
        ];
        let merged = merge_similar(&boxes, 10);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0], BoundingBox::new(100, 98, 96, 245));
        assert_eq!(merged[1], boxes[1]);
    }

    #[test]
    fn test_merge_requires_both_size_and_position() {
        let boxes = [BoundingBox::new(0, 0, 100, 100), BoundingBox::new(0, 0, 115, 100)];
        assert_eq!(merge_similar(&boxes, 10).len(), 2);
    }

    #[test]
    fn test_blank_sheet_reports_zero_blocks() {
        let image = RgbImage::from_pixel(600, 800, Rgb([255, 255, 255]));
        let boxes = BlockLocator::find_boxes(&image);
        match BlockLocator::locate(&boxes) {
            Err(ScoreError::BlockCount { found }) => assert_eq!(found, 0),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_locate_numbers_fourteen_boxes() {
        let boxes: Vec<BoundingBox> = (0..14).map(|i| BoundingBox::new(i * 10, 0, 5, 5)).collect();
        let blocks = BlockLocator::locate(&boxes).unwrap();
        assert_eq!(blocks[13], Block::new(13, boxes[13]));
        assert!(matches!(
            BlockLocator::locate(&boxes[..13]),
            Err(ScoreError::BlockCount { found: 13 })
        ));
    }

    #[test]
    fn test_few_candidates_skip_aspect_filter() {
        let mut image = RgbImage::from_pixel(600, 800, Rgb([255, 255, 255]));
        // 4:1, outside the block aspect range
        draw_hollow_rect_mut(&mut image, Rect::at(50, 300).of_size(400, 100), Rgb([0, 0, 0]));
        let boxes = BlockLocator::find_boxes(&image);
        assert_eq!(boxes.len(), 1);
        assert!(boxes[0].aspect_ratio() > 1.5);
    }

    #[test]
    fn test_frame_kernel_grows_down_and_right() {
        let mut mask = GrayImage::new(5, 5);
        mask.put_pixel(2, 2, Luma([255]));
        let dilated = grayscale_dilate(&mask, &frame_kernel());
        assert_eq!(dilated.get_pixel(2, 2)[0], 255);
        assert_eq!(dilated.get_pixel(3, 3)[0], 255);
        assert_eq!(dilated.get_pixel(1, 1)[0], 0);
        assert_eq!(dilated.pixels().filter(|p| p[0] == 255).count(), 4);

        let mut gap = GrayImage::new(7, 3);
        for x in [1, 2, 4, 5] {
            gap.put_pixel(x, 1, Luma([255]));
        }
        let closed = grayscale_close(&gap, &frame_kernel());
        assert!((0..3).any(|y| closed.get_pixel(3, y)[0] == 255));
    }

    #[test]
    fn test_header_box_is_ignored() {
        let mut image = RgbImage::from_pixel(600, 800, Rgb([255, 255, 255]));
        // Above 2/11 of the height
        draw_hollow_rect_mut(&mut image, Rect::at(50, 20).of_size(400, 100), Rgb([0, 0, 0]));
        draw_hollow_rect_mut(&mut image, Rect::at(50, 300).of_size(200, 260), Rgb([0, 0, 0]));
        let boxes = BlockLocator::find_boxes(&image);
        assert_eq!(boxes.len(), 1);
        assert!((boxes[0].y - 300).abs() <= 2);
        assert!((boxes[0].width - 200).abs() <= 3);
    }
}
