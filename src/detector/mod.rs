//! Sheet detection modules
//!
//! Everything that turns a photographed sheet into located regions:
//! - Skew removal from long straight edges
//! - Location of the 14 answer blocks, including the Part 3 column split
//! - Bubble reading inside one grid cell

/// Block location and raster ordering
pub mod blocks;
/// Filled/unfilled bubble detection
pub mod bubble;
/// Vertical and horizontal skew correction
pub mod orientation;

pub use blocks::BlockLocator;
pub use bubble::BubbleDetector;
pub use orientation::OrientationCorrector;
