//! Part 1: forty multiple-choice questions, ten per block
use image::RgbImage;
use log::debug;

use crate::decoder::grid::{CellOrder, GridSpec, PartReading, blocks_of, walk};
use crate::decoder::tables::PART1_LETTERS;
use crate::error::ScoreError;
use crate::models::{Block, Part, Part1Answer};

/// Ten rows of A-D choices
pub const GRID: GridSpec = GridSpec {
    rows: 10,
    cols: 4,
    pitch_x: 0.2,
    pitch_y: 0.09,
    inset_x: 0.154,
    inset_y: 0.095,
    order: CellOrder::RowMajor,
};

/// Questions per block
pub const QUESTIONS_PER_BLOCK: u32 = 10;

/// Read every filled choice; a row with several filled cells yields several answers
pub fn decode(image: &RgbImage, blocks: &[Block]) -> Result<PartReading<Part1Answer>, ScoreError> {
    let mut reading = PartReading::default();
    for block in blocks_of(blocks, Part::Part1) {
        let base = block.index_in_part() as u32 * QUESTIONS_PER_BLOCK;
        for read in walk(image, block, &GRID, Part::Part1)? {
            if read.is_filled() {
                reading.answers.push(Part1Answer {
                    question: base + read.cell.row as u32 + 1,
                    letter: PART1_LETTERS[read.cell.col],
                });
            }
            reading.reads.push(read);
        }
    }
    debug!("part 1: {} answers", reading.answers.len());
    Ok(reading)
}
