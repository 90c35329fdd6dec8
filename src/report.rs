//! Result document and annotated image
//!
//! The document layout is fixed:
//!
//! ```text
//! {"version":"15","answers":{"1":{..},"2":{..},"3":{..}},"status_code":0}
//! ```
//!
//! `answers` only appears when something was read, `error` only when the
//! status is not 0.
use std::path::Path;

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::ScorerConfig;
use crate::error::ScoreError;
use crate::models::{BoundingBox, PointI, SheetAnswers};

/// Result format version
pub const RESULT_VERSION: &str = "15";

const MARK_COLOR: Rgb<u8> = Rgb([0, 0, 255]);
const BLOCK_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const CELL_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const CELL_RADIUS: i32 = 2;

/// Outcome of one scoring call
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreReport {
    /// 0 success, 1 fault, 2 nothing detected
    pub status_code: u8,
    /// Error text, set iff `status_code != 0`
    pub error: Option<String>,
    /// Answers read from the sheet, when any
    pub answers: Option<SheetAnswers>,
}

#[derive(Serialize)]
struct ResultDocument<'a> {
    version: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    answers: Option<Map<String, Value>>,
    status_code: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

impl ScoreReport {
    /// Successful read
    pub fn success(answers: SheetAnswers) -> Self {
        Self {
            status_code: 0,
            error: None,
            answers: Some(answers),
        }
    }

    /// Failed call; answers are dropped
    pub fn failure(err: &ScoreError) -> Self {
        Self {
            status_code: err.status_code(),
            error: Some(err.to_string()),
            answers: None,
        }
    }

    /// Failed call that still carries the answers it read
    pub fn failure_with_answers(err: &ScoreError, answers: SheetAnswers) -> Self {
        Self {
            answers: Some(answers),
            ..Self::failure(err)
        }
    }

    /// Whether the call succeeded
    pub fn is_success(&self) -> bool {
        self.status_code == 0
    }

    /// Result document as a JSON value
    pub fn to_value(&self) -> Value {
        let document = ResultDocument {
            version: RESULT_VERSION,
            answers: self
                .answers
                .as_ref()
                .filter(|a| !a.is_empty())
                .map(answers_object),
            status_code: self.status_code,
            error: self.error.as_deref(),
        };
        serde_json::to_value(document).unwrap_or(Value::Null)
    }

    /// Pretty-printed result document
    pub fn to_json(&self) -> String {
        let value = self.to_value();
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
    }
}

/// Answers keyed by part, then by question number
///
/// Keys keep first-insertion order and a repeated key keeps the last value.
pub fn answers_object(answers: &SheetAnswers) -> Map<String, Value> {
    let mut part1 = Map::new();
    for a in &answers.part1 {
        part1.insert(a.question.to_string(), Value::String(a.letter.to_string()));
    }

    let mut part2 = Map::new();
    for a in &answers.part2 {
        let entry = part2
            .entry(a.question.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(subs) = entry {
            subs.insert(a.sub_label.to_string(), Value::Bool(a.choice));
        }
    }

    let mut part3 = Map::new();
    for a in &answers.part3 {
        part3.insert(a.question.to_string(), Value::String(a.code.clone()));
    }

    let mut object = Map::new();
    object.insert("1".to_string(), Value::Object(part1));
    object.insert("2".to_string(), Value::Object(part2));
    object.insert("3".to_string(), Value::Object(part3));
    object
}

/// Debug drawing on the normalized sheet
pub struct Overlay<'a> {
    config: &'a ScorerConfig,
}

impl<'a> Overlay<'a> {
    /// Overlay drawing what `config` enables
    pub fn new(config: &'a ScorerConfig) -> Self {
        Self { config }
    }

    /// Two-pixel outlines around located blocks
    pub fn draw_blocks(&self, image: &mut RgbImage, boxes: &[BoundingBox]) {
        if !self.config.draw_blocks {
            return;
        }
        for b in boxes {
            for inset in 0..2 {
                let (w, h) = (b.width - 2 * inset, b.height - 2 * inset);
                if w <= 0 || h <= 0 {
                    continue;
                }
                let rect = Rect::at(b.x + inset, b.y + inset).of_size(w as u32, h as u32);
                draw_hollow_rect_mut(image, rect, BLOCK_COLOR);
            }
        }
    }

    /// Small dots at the point of every read cell
    pub fn draw_cells(&self, image: &mut RgbImage, points: impl IntoIterator<Item = PointI>) {
        if !self.config.draw_cells {
            return;
        }
        for p in points {
            draw_filled_circle_mut(image, (p.x, p.y), CELL_RADIUS, CELL_COLOR);
        }
    }

    /// Filled disks over filled marks
    pub fn draw_marks(&self, image: &mut RgbImage, points: impl IntoIterator<Item = PointI>) {
        if !self.config.draw_marks {
            return;
        }
        for p in points {
            draw_filled_circle_mut(image, (p.x, p.y), self.config.mark_radius, MARK_COLOR);
        }
    }
}

/// Write the annotated sheet; the format follows the file extension
pub fn persist(image: &RgbImage, path: &Path) -> Result<(), ScoreError> {
    image.save(path).map_err(ScoreError::OutputWrite)
}
