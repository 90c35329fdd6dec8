//! Grid walk shared by the three part decoders
//!
//! A block's cells are laid out from fractions of the block size. Every
//! fraction is truncated to whole pixels before use, and each cell is one
//! pixel larger than the pitch so neighbouring cells overlap by a pixel.
use image::RgbImage;
use image::imageops::crop_imm;

use crate::detector::bubble::{BubbleDetector, cell_point};
use crate::error::ScoreError;
use crate::models::{Block, BoundingBox, Mark, Part, PointI};

/// Threshold handed to the bubble detector for interface compatibility
pub const LEGACY_THRESHOLD: u8 = 200;

/// Order in which a grid is visited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellOrder {
    /// Row by row, left to right
    RowMajor,
    /// Column by column, top to bottom
    ColumnMajor,
}

/// Cell layout of one block type, as fractions of the block size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpec {
    /// Number of rows
    pub rows: usize,
    /// Number of columns
    pub cols: usize,
    /// Column pitch over block width
    pub pitch_x: f64,
    /// Row pitch over block height
    pub pitch_y: f64,
    /// Left inset over block width
    pub inset_x: f64,
    /// Top inset over block height
    pub inset_y: f64,
    /// Visiting order
    pub order: CellOrder,
}

/// One grid position of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Row within the block
    pub row: usize,
    /// Column within the block
    pub col: usize,
    /// Cell rectangle in image coordinates
    pub bounds: BoundingBox,
}

impl GridSpec {
    /// Cells of `block` in visiting order
    pub fn cells(&self, block: &BoundingBox) -> Vec<Cell> {
        let pitch_x = (block.width as f64 * self.pitch_x) as i32;
        let pitch_y = (block.height as f64 * self.pitch_y) as i32;
        let inset_x = (block.width as f64 * self.inset_x) as i32;
        let inset_y = (block.height as f64 * self.inset_y) as i32;

        let cell = |row: usize, col: usize| Cell {
            row,
            col,
            bounds: BoundingBox::new(
                block.x + inset_x + pitch_x * col as i32 + 1,
                block.y + inset_y + pitch_y * row as i32 + 1,
                pitch_x + 1,
                pitch_y + 1,
            ),
        };

        let mut cells = Vec::with_capacity(self.rows * self.cols);
        match self.order {
            CellOrder::RowMajor => {
                for row in 0..self.rows {
                    for col in 0..self.cols {
                        cells.push(cell(row, col));
                    }
                }
            }
            CellOrder::ColumnMajor => {
                for col in 0..self.cols {
                    for row in 0..self.rows {
                        cells.push(cell(row, col));
                    }
                }
            }
        }
        cells
    }
}

/// Result of reading one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRead {
    /// Block the cell belongs to
    pub block: usize,
    /// Cell that was read
    pub cell: Cell,
    /// Detector outcome, relative to the cell origin
    pub mark: Mark,
}

impl CellRead {
    /// Whether the cell holds a filled bubble
    pub fn is_filled(&self) -> bool {
        self.mark.is_filled()
    }

    /// Image point of the located bubble, or the cell center when none was found
    pub fn image_point(&self) -> PointI {
        let local = cell_point(&self.mark, self.cell.bounds.width, self.cell.bounds.height);
        local.translate(self.cell.bounds.x, self.cell.bounds.y)
    }
}

/// Answers of one part plus every cell read behind them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartReading<A> {
    /// Decoded answers
    pub answers: Vec<A>,
    /// Every read cell, in walk order
    pub reads: Vec<CellRead>,
}

impl<A> Default for PartReading<A> {
    fn default() -> Self {
        Self {
            answers: Vec::new(),
            reads: Vec::new(),
        }
    }
}

/// Blocks owned by `part`, in index order
pub fn blocks_of(blocks: &[Block], part: Part) -> impl Iterator<Item = &Block> {
    let zone = part.zone();
    blocks.iter().filter(move |b| zone.contains(&b.index))
}

/// Read every cell of `block`
///
/// A cell that does not lie fully inside the image aborts the walk.
pub fn walk(
    image: &RgbImage,
    block: &Block,
    spec: &GridSpec,
    part: Part,
) -> Result<Vec<CellRead>, ScoreError> {
    let (w, h) = image.dimensions();
    spec.cells(&block.bounds)
        .into_iter()
        .map(|cell| {
            let b = cell.bounds;
            if !b.fits_within(w, h) {
                return Err(ScoreError::Decode {
                    part,
                    message: format!(
                        "cell ({}, {}) of block {} at ({}, {}, {}x{}) lies outside the {}x{} image",
                        cell.row, cell.col, block.index, b.x, b.y, b.width, b.height, w, h
                    ),
                });
            }
            let region = crop_imm(image, b.x as u32, b.y as u32, b.width as u32, b.height as u32)
                .to_image();
            Ok(CellRead {
                block: block.index,
                cell,
                mark: BubbleDetector::detect(&region, LEGACY_THRESHOLD),
            })
        })
        .collect()
}
