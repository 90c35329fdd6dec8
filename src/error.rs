//! Error types for scoring and answer-key parsing
use thiserror::Error;

use crate::models::Part;

/// Stage of one scoring call, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Reading the source image
    Load,
    /// Skew removal and height normalization
    Rectify,
    /// Block location
    Locate,
    /// Part 1 grid walk
    DecodePart1,
    /// Part 2 grid walk
    DecodePart2,
    /// Part 3 grid walk
    DecodePart3,
    /// Merging the answer sets
    Assemble,
    /// Writing the annotated image
    Persist,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Load => "load",
            Phase::Rectify => "rectify",
            Phase::Locate => "locate",
            Phase::DecodePart1 => "decode part 1",
            Phase::DecodePart2 => "decode part 2",
            Phase::DecodePart3 => "decode part 3",
            Phase::Assemble => "assemble",
            Phase::Persist => "persist",
        };
        f.write_str(name)
    }
}

/// Terminal failure of one scoring call
#[derive(Debug, Error)]
pub enum ScoreError {
    /// The source image is missing or cannot be decoded
    #[error("Image not found")]
    ImageLoad(#[source] image::ImageError),

    /// Block location did not produce the 14 template regions
    #[error("Found {found} bounding boxes, expected 14")]
    BlockCount {
        /// Number of blocks actually located
        found: usize,
    },

    /// A grid walk hit a fault
    #[error("{message}")]
    Decode {
        /// Part whose walk failed
        part: Part,
        /// Fault description
        message: String,
    },

    /// Every part decoded cleanly but nothing was marked
    #[error("No answers detected")]
    NoAnswers,

    /// The annotated image could not be written
    #[error("Failed to save output image")]
    OutputWrite(#[source] image::ImageError),
}

impl ScoreError {
    /// Status code reported in the result document
    pub fn status_code(&self) -> u8 {
        match self {
            ScoreError::NoAnswers => 2,
            _ => 1,
        }
    }

    /// Phase that raised the error
    pub fn phase(&self) -> Phase {
        match self {
            ScoreError::ImageLoad(_) => Phase::Load,
            ScoreError::BlockCount { .. } => Phase::Locate,
            ScoreError::Decode { part: Part::Part1, .. } => Phase::DecodePart1,
            ScoreError::Decode { part: Part::Part2, .. } => Phase::DecodePart2,
            ScoreError::Decode { part: Part::Part3, .. } => Phase::DecodePart3,
            ScoreError::NoAnswers => Phase::Assemble,
            ScoreError::OutputWrite(_) => Phase::Persist,
        }
    }
}

/// Answer-key document rejected during parsing
#[derive(Debug, Error)]
pub enum KeyError {
    /// Not valid JSON, or not shaped like an answer key
    #[error("malformed answer key: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Question number outside the part's range
    #[error("{part}: question {question:?} out of range")]
    QuestionOutOfRange {
        /// Part the entry belongs to
        part: Part,
        /// Offending key as written
        question: String,
    },

    /// Part 1 value that is not a single letter A-D
    #[error("{part}: invalid letter {value:?} for question {question}")]
    InvalidLetter {
        /// Part the entry belongs to
        part: Part,
        /// Question number
        question: u32,
        /// Offending value
        value: String,
    },

    /// Part 2 statement label that is not a-d
    #[error("{part}: invalid sub-question {value:?} for question {question}")]
    InvalidSubLabel {
        /// Part the entry belongs to
        part: Part,
        /// Question number
        question: u32,
        /// Offending label
        value: String,
    },

    /// Part 3 code that is too long or uses a symbol outside the code table
    #[error("{part}: invalid code {value:?} for question {question}")]
    InvalidCode {
        /// Part the entry belongs to
        part: Part,
        /// Question number
        question: u32,
        /// Offending code
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_and_status_codes() {
        let err = ScoreError::BlockCount { found: 9 };
        assert_eq!(err.to_string(), "Found 9 bounding boxes, expected 14");
        assert_eq!(err.status_code(), 1);
        assert_eq!(ScoreError::NoAnswers.to_string(), "No answers detected");
        assert_eq!(ScoreError::NoAnswers.status_code(), 2);

        let err = ScoreError::Decode {
            part: Part::Part2,
            message: "cell (3, 1) of block 5 lies outside the image".to_string(),
        };
        assert_eq!(err.status_code(), 1);
        assert_eq!(err.phase(), Phase::DecodePart2);
        assert!(err.to_string().starts_with("cell (3, 1)"));
    }

    #[test]
    fn test_io_backed_messages_are_fixed() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = ScoreError::ImageLoad(image::ImageError::IoError(io));
        assert_eq!(err.to_string(), "Image not found");

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ScoreError::OutputWrite(image::ImageError::IoError(io));
        assert_eq!(err.to_string(), "Failed to save output image");
    }
}
