//! Grid decoding modules
//!
//! Each part walks its blocks with one shared grid routine and turns the
//! filled cells into answers:
//! - Part 1: question per row, letter per column
//! - Part 2: two yes/no questions per block
//! - Part 3: one code per block, symbols by row

/// Parameterized cell grid and walk
pub mod grid;
/// Multiple-choice decoding
pub mod part1;
/// Yes/no statement decoding
pub mod part2;
/// Numeric code decoding
pub mod part3;
/// Label and symbol tables
pub mod tables;

pub use grid::{Cell, CellOrder, CellRead, GridSpec, PartReading};
