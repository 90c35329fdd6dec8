//! omr_scorer - optical mark recognition for a fixed three-part answer sheet
//!
//! Reads a photographed sheet, removes skew, locates the 14 answer blocks,
//! reads every bubble and reports the marked answers as a JSON document.
//! An annotated copy of the normalized sheet is written next to the result.
//!
//! ```no_run
//! let json = omr_scorer::process_image("sheet.jpg", "annotated.png", "");
//! println!("{json}");
//! ```

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Answer-key parsing and grading
pub mod answer_key;
/// Scorer configuration and environment overrides
pub mod config;
/// Grid decoding of the three parts
pub mod decoder;
/// Skew correction, block location and bubble reading
pub mod detector;
/// Error types
pub mod error;
/// Core data structures (boxes, blocks, marks, answers)
pub mod models;
/// Phase orchestration
pub mod pipeline;
/// Result document and annotated image
pub mod report;
/// Helpers for the CLI, benches and tests (image loading, synthetic sheets)
pub mod tools;
/// Image-processing primitives (grayscale, thresholds, contours, lines)
pub mod utils;

pub use answer_key::{AnswerKey, Grade, Tally};
pub use config::ScorerConfig;
pub use error::{KeyError, Phase, ScoreError};
pub use models::{
    Block, BoundingBox, Mark, Part, Part1Answer, Part2Answer, Part3Answer, PointI, SheetAnswers,
};
pub use pipeline::{Evaluation, Scorer};
pub use report::{RESULT_VERSION, ScoreReport};

use std::path::Path;

/// Score one sheet and return the pretty-printed result document
///
/// `answer_key_json` is validated and otherwise unused. Configuration
/// comes from the `OMR_*` environment variables, read once per process.
pub fn process_image<P: AsRef<Path>, Q: AsRef<Path>>(
    image_path: P,
    output_path: Q,
    answer_key_json: &str,
) -> String {
    let scorer = Scorer::new(config::env_config().clone());
    scorer
        .score(image_path.as_ref(), output_path.as_ref(), answer_key_json)
        .to_json()
}

/// Crate version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
