//! Part 3: six numeric codes, one per column block
use image::RgbImage;
use log::debug;

use crate::decoder::grid::{CellOrder, GridSpec, PartReading, blocks_of, walk};
use crate::decoder::tables::PART3_SYMBOLS;
use crate::error::ScoreError;
use crate::models::{Block, Part, Part3Answer};

/// Twelve symbol rows by four digit positions, read column by column
pub const GRID: GridSpec = GridSpec {
    rows: 12,
    cols: 4,
    pitch_x: 0.19,
    pitch_y: 0.07,
    inset_x: 0.18,
    inset_y: 0.1625,
    order: CellOrder::ColumnMajor,
};

/// Longest code a block can hold
pub const MAX_CODE_LEN: usize = 4;

/// Concatenate the filled symbols of each block; blocks with nothing filled are skipped
pub fn decode(image: &RgbImage, blocks: &[Block]) -> Result<PartReading<Part3Answer>, ScoreError> {
    let mut reading = PartReading::default();
    for block in blocks_of(blocks, Part::Part3) {
        let mut code = String::new();
        for read in walk(image, block, &GRID, Part::Part3)? {
            if read.is_filled() {
                code.push(PART3_SYMBOLS[read.cell.row]);
            }
            reading.reads.push(read);
        }
        if !code.is_empty() {
            reading.answers.push(Part3Answer {
                question: block.index_in_part() as u32 + 1,
                code,
            });
        }
    }
    debug!("part 3: {} answers", reading.answers.len());
    Ok(reading)
}
