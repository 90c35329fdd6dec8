//! Scoring pipeline
//!
//! One call runs Load, Rectify, Locate, the three part decodes and
//! Assemble in order, stopping at the first failing phase. The annotated
//! sheet is written afterwards whenever an image was loaded, so the
//! output file exists even for rejected sheets.
use std::path::Path;

use image::RgbImage;
use image::imageops::FilterType;
use log::{debug, info, warn};

use crate::answer_key::AnswerKey;
use crate::config::ScorerConfig;
use crate::decoder::{part1, part2, part3};
use crate::detector::{BlockLocator, OrientationCorrector};
use crate::error::{Phase, ScoreError};
use crate::models::{BoundingBox, SheetAnswers};
use crate::report::{Overlay, ScoreReport, persist};

/// Result of running the pipeline on an in-memory image
#[derive(Debug)]
pub struct Evaluation {
    /// Answers, or the error of the first failing phase
    pub outcome: Result<SheetAnswers, ScoreError>,
    /// Located block boxes, whatever their count
    pub boxes: Vec<BoundingBox>,
    /// Normalized sheet with the configured overlay drawn on it
    pub annotated: RgbImage,
}

/// Configurable scoring entry point
#[derive(Debug, Clone, Default)]
pub struct Scorer {
    config: ScorerConfig,
}

impl Scorer {
    /// Scorer with explicit configuration
    pub fn new(config: ScorerConfig) -> Self {
        Self { config }
    }

    /// Scorer configured from `OMR_*` environment variables
    pub fn from_env() -> Self {
        Self::new(ScorerConfig::from_env())
    }

    /// Active configuration
    pub fn config(&self) -> &ScorerConfig {
        &self.config
    }

    /// Score the sheet at `image_path` and write the annotated copy to `output_path`
    ///
    /// The answer key is validated but does not influence the result; an
    /// invalid key is only logged.
    pub fn score(&self, image_path: &Path, output_path: &Path, answer_key_json: &str) -> ScoreReport {
        check_answer_key(answer_key_json);

        let image = match load_image(image_path) {
            Ok(image) => image,
            Err(err) => {
                warn!("{} failed for {}: {err}", Phase::Load, image_path.display());
                return ScoreReport::failure(&err);
            }
        };

        let Evaluation {
            outcome, annotated, ..
        } = self.evaluate(image);

        let written = persist(&annotated, output_path);
        if let Err(err) = &written {
            warn!("{} failed for {}: {err}", Phase::Persist, output_path.display());
        }

        match (outcome, written) {
            (Ok(answers), Ok(())) => {
                info!("scored {} answers", answers.len());
                ScoreReport::success(answers)
            }
            (Ok(answers), Err(err)) => ScoreReport::failure_with_answers(&err, answers),
            (Err(err), _) => {
                info!("{} failed: {err}", err.phase());
                ScoreReport::failure(&err)
            }
        }
    }

    /// Run every phase after Load on an in-memory image
    pub fn evaluate(&self, image: RgbImage) -> Evaluation {
        let image = self.rectify(image);
        let mut annotated = image.clone();
        let overlay = Overlay::new(&self.config);

        let boxes = BlockLocator::find_boxes(&image);
        overlay.draw_blocks(&mut annotated, &boxes);

        let outcome = BlockLocator::locate(&boxes).and_then(|blocks| {
            let reading1 = part1::decode(&image, &blocks)?;
            let reading2 = part2::decode(&image, &blocks)?;
            let reading3 = part3::decode(&image, &blocks)?;

            let reads = reading1
                .reads
                .iter()
                .chain(&reading2.reads)
                .chain(&reading3.reads);
            overlay.draw_cells(&mut annotated, reads.clone().map(|p| p.image_point()));
            overlay.draw_marks(
                &mut annotated,
                reads.filter(|p| p.is_filled()).map(|p| p.image_point()),
            );

            assemble(SheetAnswers {
                part1: reading1.answers,
                part2: reading2.answers,
                part3: reading3.answers,
            })
        });

        Evaluation {
            outcome,
            boxes,
            annotated,
        }
    }

    /// Skew removal followed by height normalization
    pub fn rectify(&self, image: RgbImage) -> RgbImage {
        let image = OrientationCorrector::correct(image, self.config.min_line_pct);
        let image = normalize_height(image, self.config.target_height);
        debug!("{} done: {}x{}", Phase::Rectify, image.width(), image.height());
        image
    }
}

/// Read the source image as RGB
pub fn load_image(path: &Path) -> Result<RgbImage, ScoreError> {
    let image = image::open(path).map_err(ScoreError::ImageLoad)?;
    Ok(image.to_rgb8())
}

/// Resize to `target_height`, keeping the aspect ratio
///
/// The width is truncated. An image already at the target height is
/// returned untouched.
pub fn normalize_height(image: RgbImage, target_height: u32) -> RgbImage {
    let (w, h) = image.dimensions();
    if h == target_height || h == 0 || target_height == 0 {
        return image;
    }
    let width = ((target_height as f64 * w as f64 / h as f64) as u32).max(1);
    image::imageops::resize(&image, width, target_height, FilterType::Triangle)
}

fn assemble(answers: SheetAnswers) -> Result<SheetAnswers, ScoreError> {
    if answers.is_empty() {
        return Err(ScoreError::NoAnswers);
    }
    Ok(answers)
}

fn check_answer_key(json: &str) {
    if json.trim().is_empty() {
        debug!("no answer key supplied");
        return;
    }
    match AnswerKey::parse(json) {
        Ok(key) => debug!("answer key with {} items", key.len()),
        Err(err) => warn!("ignoring answer key: {err}"),
    }
}
