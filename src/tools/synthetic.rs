//! Synthetic answer-sheet renderer
//!
//! Draws the printed template (header, block frames, Part 3 container and
//! columns, an empty ring in every cell) and fills the requested bubbles.
//! Bubbles are placed on the cell grid of the blocks the locator actually
//! finds in the rendered frames, so they line up with what the decoders
//! read.
use std::collections::HashSet;

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut, draw_hollow_circle_mut};
use imageproc::rect::Rect;

use crate::decoder::grid::GridSpec;
use crate::decoder::tables::{PART1_LETTERS, PART2_SUB_LABELS, part3_row};
use crate::decoder::{part1, part2, part3};
use crate::detector::BlockLocator;
use crate::detector::blocks::EXPECTED_BLOCKS;
use crate::models::{BoundingBox, Part};

/// Rendered sheet width
pub const SHEET_WIDTH: u32 = 1000;
/// Rendered sheet height, already at the normalization height
pub const SHEET_HEIGHT: u32 = 1280;

const INK: Rgb<u8> = Rgb([0, 0, 0]);
const PAPER: Rgb<u8> = Rgb([255, 255, 255]);
/// Printed rings are faint so that resampling never thickens them into a fill
const RING: Rgb<u8> = Rgb([215, 215, 215]);
const FRAME: i32 = 3;
const COLUMN_LEFT_FRAME: i32 = 12;
const COLUMN_FRAME: i32 = 2;
const BLOCK_XS: [i32; 4] = [40, 280, 520, 760];

/// Printed frame of every region
#[derive(Debug, Clone)]
pub struct SheetLayout {
    /// Title box above the answer area
    pub header: BoundingBox,
    /// Part 1 block frames
    pub part1: [BoundingBox; 4],
    /// Part 2 block frames
    pub part2: [BoundingBox; 4],
    /// Frame around the Part 3 columns
    pub container: BoundingBox,
    /// Part 3 column frames
    pub part3: [BoundingBox; 6],
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            header: BoundingBox::new(40, 40, 920, 150),
            part1: BLOCK_XS.map(|x| BoundingBox::new(x, 270, 200, 300)),
            part2: BLOCK_XS.map(|x| BoundingBox::new(x, 620, 200, 160)),
            container: BoundingBox::new(40, 830, 920, 420),
            part3: [0, 1, 2, 3, 4, 5].map(|i| BoundingBox::new(80 + 145 * i, 890, 96, 246)),
        }
    }
}

impl SheetLayout {
    /// Where the locator is expected to find the 14 blocks
    pub fn expected_blocks(&self) -> Vec<BoundingBox> {
        let framed = self
            .part1
            .iter()
            .chain(&self.part2)
            .map(|b| BoundingBox::new(b.x - 1, b.y - 1, b.width + 3, b.height + 3));
        let columns = self
            .part3
            .iter()
            .map(|b| BoundingBox::new(b.x - 2, b.y - 2, b.width + 4, b.height + 4));
        framed.chain(columns).collect()
    }
}

fn grid_of(part: Part) -> (&'static GridSpec, i32) {
    match part {
        Part::Part1 => (&part1::GRID, 8),
        Part::Part2 => (&part2::GRID, 8),
        Part::Part3 => (&part3::GRID, 5),
    }
}

/// Builder for a synthetic sheet
#[derive(Debug, Clone, Default)]
pub struct SheetBuilder {
    layout: SheetLayout,
    filled: HashSet<(usize, usize, usize)>,
}

impl SheetBuilder {
    /// Blank template with the default layout
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `letter` for Part 1 question 1-40
    pub fn fill_part1(mut self, question: u32, letter: char) -> Self {
        let col = PART1_LETTERS.iter().position(|&l| l == letter);
        if let (Some(col), 1..=40) = (col, question) {
            let q = (question - 1) as usize;
            self.filled.insert((q / 10, q % 10, col));
        }
        self
    }

    /// Mark yes (`true`) or no for statement `sub_label` of Part 2 question 1-8
    pub fn fill_part2(mut self, question: u32, sub_label: char, choice: bool) -> Self {
        let row = PART2_SUB_LABELS.iter().position(|&l| l == sub_label);
        if let (Some(row), 1..=8) = (row, question) {
            let q = (question - 1) as usize;
            let col = (q % 2) * 2 + usize::from(!choice);
            self.filled.insert((4 + q / 2, row, col));
        }
        self
    }

    /// Write `code` (up to four symbols) into Part 3 question 1-6
    pub fn fill_part3(mut self, question: u32, code: &str) -> Self {
        if !(1..=6).contains(&question) {
            return self;
        }
        let block = 8 + (question - 1) as usize;
        for (col, symbol) in code.chars().take(part3::MAX_CODE_LEN).enumerate() {
            if let Some(row) = part3_row(symbol) {
                self.filled.insert((block, row, col));
            }
        }
        self
    }

    /// Printed layout
    pub fn layout(&self) -> &SheetLayout {
        &self.layout
    }

    /// Template without any bubbles
    pub fn frames(&self) -> RgbImage {
        let mut image = RgbImage::from_pixel(SHEET_WIDTH, SHEET_HEIGHT, PAPER);
        let l = &self.layout;
        draw_frame(&mut image, &l.header, FRAME, FRAME);
        for b in l.part1.iter().chain(&l.part2) {
            draw_frame(&mut image, b, FRAME, FRAME);
        }
        draw_frame(&mut image, &l.container, FRAME, FRAME);
        for b in &l.part3 {
            draw_frame(&mut image, b, COLUMN_LEFT_FRAME, COLUMN_FRAME);
        }
        image
    }

    /// Render the sheet
    pub fn build(&self) -> RgbImage {
        let mut image = self.frames();
        let mut blocks = BlockLocator::find_boxes(&image);
        if blocks.len() != EXPECTED_BLOCKS {
            blocks = self.layout.expected_blocks();
        }

        for (index, block) in blocks.iter().enumerate() {
            let Some(part) = Part::of_block(index) else {
                continue;
            };
            let (grid, radius) = grid_of(part);
            for cell in grid.cells(block) {
                let c = cell.bounds.center();
                if self.filled.contains(&(index, cell.row, cell.col)) {
                    draw_filled_circle_mut(&mut image, (c.x, c.y), radius, INK);
                } else {
                    draw_hollow_circle_mut(&mut image, (c.x, c.y), radius, RING);
                }
            }
        }
        image
    }
}

/// Frame `b` with the given left-edge and other-edge thickness, drawn inward
fn draw_frame(image: &mut RgbImage, b: &BoundingBox, left: i32, other: i32) {
    let bars = [
        (b.x, b.y, left, b.height),
        (b.right() - other, b.y, other, b.height),
        (b.x, b.y, b.width, other),
        (b.x, b.bottom() - other, b.width, other),
    ];
    for (x, y, w, h) in bars {
        if w > 0 && h > 0 {
            draw_filled_rect_mut(image, Rect::at(x, y).of_size(w as u32, h as u32), INK);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_requests_map_to_cells() {
        let sheet = SheetBuilder::new()
            .fill_part1(13, 'C')
            .fill_part2(3, 'b', false)
            .fill_part3(2, "7,")
            .fill_part1(41, 'A')
            .fill_part1(1, 'E');
        assert!(sheet.filled.contains(&(1, 2, 2)));
        assert!(sheet.filled.contains(&(5, 1, 1)));
        assert!(sheet.filled.contains(&(9, 9, 0)));
        assert!(sheet.filled.contains(&(9, 1, 1)));
        assert_eq!(sheet.filled.len(), 4);
    }

    #[test]
    fn test_frames_are_drawn_inward() {
        let image = SheetBuilder::new().frames();
        let b = SheetLayout::default().part1[0];
        assert_eq!(*image.get_pixel(b.x as u32, b.y as u32), INK);
        assert_eq!(*image.get_pixel((b.x + 2) as u32, (b.y + 100) as u32), INK);
        assert_eq!(*image.get_pixel((b.x + 3) as u32, (b.y + 100) as u32), PAPER);
        assert_eq!(*image.get_pixel((b.x - 1) as u32, (b.y + 100) as u32), PAPER);
    }

    #[test]
    fn test_rings_are_faint_and_marks_are_ink() {
        let sheet = SheetBuilder::new().fill_part1(1, 'A');
        let image = sheet.build();
        let blocks = BlockLocator::find_boxes(&sheet.frames());
        let cells = part1::GRID.cells(&blocks[0]);

        let filled = cells[0].bounds.center();
        assert_eq!(*image.get_pixel(filled.x as u32, filled.y as u32), INK);

        let empty = cells[1].bounds.center();
        assert_eq!(*image.get_pixel(empty.x as u32, empty.y as u32), PAPER);
        assert_eq!(*image.get_pixel((empty.x + 8) as u32, empty.y as u32), RING);
    }

    #[test]
    fn test_column_frames_are_two_pixels() {
        let image = SheetBuilder::new().frames();
        let b = SheetLayout::default().part3[0];
        let mid = (b.y + b.height / 2) as u32;
        assert_eq!(*image.get_pixel((b.x + 11) as u32, mid), INK);
        assert_eq!(*image.get_pixel((b.x + 12) as u32, mid), PAPER);
        assert_eq!(*image.get_pixel((b.right() - 2) as u32, mid), INK);
        assert_eq!(*image.get_pixel((b.right() - 3) as u32, mid), PAPER);
        let top = (b.y + 1) as u32;
        assert_eq!(*image.get_pixel((b.x + 50) as u32, top), INK);
    }

    #[test]
    fn test_expected_blocks_cover_every_zone() {
        let expected = SheetLayout::default().expected_blocks();
        assert_eq!(expected.len(), EXPECTED_BLOCKS);
        assert!(expected[8].aspect_ratio() > 0.35 && expected[8].aspect_ratio() < 0.45);
    }
}
