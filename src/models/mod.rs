/// Decoded answers for the three sheet parts
pub mod answer;
/// Bubble detection outcome
pub mod mark;
/// Pixel coordinates
pub mod point;
/// Boxes and located blocks
pub mod region;

pub use answer::{Part1Answer, Part2Answer, Part3Answer, SheetAnswers};
pub use mark::Mark;
pub use point::{Point, PointI};
pub use region::{Block, BoundingBox, Part};
