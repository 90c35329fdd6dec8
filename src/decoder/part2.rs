//! Part 2: eight questions of four yes/no statements
//!
//! Each block holds two questions side by side. Columns come in yes/no
//! pairs and rows are the statements a-d.
use image::RgbImage;
use log::debug;

use crate::decoder::grid::{CellOrder, GridSpec, PartReading, blocks_of, walk};
use crate::decoder::tables::PART2_SUB_LABELS;
use crate::error::ScoreError;
use crate::models::{Block, Part, Part2Answer};

/// Four statements by two yes/no pairs
pub const GRID: GridSpec = GridSpec {
    rows: 4,
    cols: 4,
    pitch_x: 0.21,
    pitch_y: 0.15,
    inset_x: 0.123,
    inset_y: 0.347,
    order: CellOrder::RowMajor,
};

/// Read every filled cell, then sort by question number *as text*
pub fn decode(image: &RgbImage, blocks: &[Block]) -> Result<PartReading<Part2Answer>, ScoreError> {
    let mut reading = PartReading::default();
    for block in blocks_of(blocks, Part::Part2) {
        let base = block.index_in_part() as u32 * 2;
        for read in walk(image, block, &GRID, Part::Part2)? {
            if read.is_filled() {
                reading.answers.push(Part2Answer {
                    question: base + read.cell.col as u32 / 2 + 1,
                    sub_label: PART2_SUB_LABELS[read.cell.row],
                    choice: read.cell.col % 2 == 0,
                });
            }
            reading.reads.push(read);
        }
    }
    sort_answers(&mut reading.answers);
    debug!("part 2: {} answers", reading.answers.len());
    Ok(reading)
}

/// Lexicographic on the question number, so "10" sorts before "2"
pub fn sort_answers(answers: &mut [Part2Answer]) {
    answers.sort_by_cached_key(|a| (a.question.to_string(), a.sub_label));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(question: u32, sub_label: char, choice: bool) -> Part2Answer {
        Part2Answer {
            question,
            sub_label,
            choice,
        }
    }

    #[test]
    fn test_question_numbers_sort_as_text() {
        let mut answers = vec![
            answer(2, 'b', true),
            answer(10, 'a', false),
            answer(2, 'a', true),
            answer(1, 'd', false),
        ];
        sort_answers(&mut answers);
        let order: Vec<(u32, char)> = answers.iter().map(|a| (a.question, a.sub_label)).collect();
        assert_eq!(order, vec![(1, 'd'), (10, 'a'), (2, 'a'), (2, 'b')]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let mut answers = vec![answer(3, 'c', true), answer(3, 'c', false)];
        sort_answers(&mut answers);
        assert!(answers[0].choice);
        assert!(!answers[1].choice);
    }
}
