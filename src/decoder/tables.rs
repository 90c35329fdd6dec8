//! Fixed label tables of the answer sheet

/// Part 1 choice letters, by column
pub const PART1_LETTERS: [char; 4] = ['A', 'B', 'C', 'D'];

/// Part 2 statement labels, by row
pub const PART2_SUB_LABELS: [char; 4] = ['a', 'b', 'c', 'd'];

/// Part 3 code symbols, by row (top to bottom)
pub const PART3_SYMBOLS: [char; 12] = ['-', ',', '0', '1', '2', '3', '4', '5', '6', '7', '8', '9'];

/// Row of a Part 3 symbol
pub fn part3_row(symbol: char) -> Option<usize> {
    PART3_SYMBOLS.iter().position(|&s| s == symbol)
}
