//! End-to-end scoring of rendered answer sheets
//!
//! Each test renders a sheet with the synthetic builder, writes it to a
//! scratch file and runs the full scoring call on it, checking the
//! result document the way a caller would see it.

use image::RgbImage;
use omr_scorer::detector::orientation::rotate;
use omr_scorer::tools::{SheetBuilder, scratch_path};
use omr_scorer::{AnswerKey, Scorer, ScorerConfig, process_image};
use serde_json::{Value, json};
use std::fs;
use std::path::PathBuf;

struct Scratch {
    image: PathBuf,
    output: PathBuf,
}

impl Scratch {
    fn new(stem: &str) -> Self {
        Self {
            image: scratch_path(stem, "png"),
            output: scratch_path(&format!("{stem}_out"), "png"),
        }
    }

    fn write(&self, image: &RgbImage) {
        image.save(&self.image).expect("write scratch sheet");
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.image);
        let _ = fs::remove_file(&self.output);
    }
}

fn score(sheet: &SheetBuilder, stem: &str) -> (Value, Scratch) {
    let scratch = Scratch::new(stem);
    scratch.write(&sheet.build());
    let json = process_image(&scratch.image, &scratch.output, "");
    let value: Value = serde_json::from_str(&json).expect("result document is JSON");
    (value, scratch)
}

#[test]
fn test_single_part1_mark() {
    let (doc, scratch) = score(&SheetBuilder::new().fill_part1(1, 'A'), "part1_single");

    assert_eq!(doc["version"], "15");
    assert_eq!(doc["status_code"], 0);
    assert!(doc.get("error").is_none());
    assert_eq!(doc["answers"]["1"], json!({"1": "A"}));
    assert_eq!(doc["answers"]["2"], json!({}));
    assert_eq!(doc["answers"]["3"], json!({}));
    assert!(scratch.output.exists());
}

#[test]
fn test_part1_marks_across_blocks() {
    let sheet = SheetBuilder::new()
        .fill_part1(3, 'B')
        .fill_part1(14, 'D')
        .fill_part1(40, 'C');
    let (doc, _scratch) = score(&sheet, "part1_blocks");

    assert_eq!(doc["status_code"], 0);
    assert_eq!(doc["answers"]["1"], json!({"3": "B", "14": "D", "40": "C"}));
}

#[test]
fn test_part2_statements() {
    let sheet = SheetBuilder::new()
        .fill_part2(1, 'a', true)
        .fill_part2(1, 'c', false)
        .fill_part2(2, 'b', true)
        .fill_part2(8, 'd', false);
    let (doc, _scratch) = score(&sheet, "part2");

    assert_eq!(doc["status_code"], 0);
    let part2 = &doc["answers"]["2"];
    assert_eq!(part2["1"], json!({"a": true, "c": false}));
    assert_eq!(part2["2"], json!({"b": true}));
    assert_eq!(part2["8"], json!({"d": false}));
    assert_eq!(doc["answers"]["1"], json!({}));
}

#[test]
fn test_part3_code() {
    let (doc, _scratch) = score(&SheetBuilder::new().fill_part3(1, "12,5"), "part3");

    assert_eq!(doc["status_code"], 0);
    assert_eq!(doc["answers"]["3"], json!({"1": "12,5"}));
}

#[test]
fn test_part3_codes_keep_block_order() {
    let sheet = SheetBuilder::new()
        .fill_part3(6, "-7")
        .fill_part3(2, "0");
    let (doc, _scratch) = score(&sheet, "part3_order");

    let keys: Vec<&String> = doc["answers"]["3"]
        .as_object()
        .expect("part 3 object")
        .keys()
        .collect();
    assert_eq!(keys, ["2", "6"]);
    assert_eq!(doc["answers"]["3"]["6"], "-7");
}

#[test]
fn test_missing_image() {
    let scratch = Scratch::new("missing");
    let json = process_image(&scratch.image, &scratch.output, "");
    let doc: Value = serde_json::from_str(&json).expect("result document is JSON");

    assert_eq!(doc["version"], "15");
    assert_eq!(doc["status_code"], 1);
    assert_eq!(doc["error"], "Image not found");
    assert!(doc.get("answers").is_none());
    assert!(!scratch.output.exists());
}

#[test]
fn test_blank_template_reports_nothing_detected() {
    let (doc, scratch) = score(&SheetBuilder::new(), "blank_template");

    assert_eq!(doc["status_code"], 2);
    assert_eq!(doc["error"], "No answers detected");
    assert!(doc.get("answers").is_none());
    assert!(scratch.output.exists());
}

#[test]
fn test_blank_page_has_no_blocks() {
    let scratch = Scratch::new("blank_page");
    scratch.write(&RgbImage::from_pixel(800, 1000, image::Rgb([255, 255, 255])));
    let json = process_image(&scratch.image, &scratch.output, "");
    let doc: Value = serde_json::from_str(&json).expect("result document is JSON");

    assert_eq!(doc["status_code"], 1);
    assert_eq!(doc["error"], "Found 0 bounding boxes, expected 14");
    assert!(scratch.output.exists());

    let written = image::open(&scratch.output).expect("annotated output");
    assert_eq!(written.height(), 1280);
}

#[test]
fn test_output_write_failure_keeps_answers() {
    let scratch = Scratch::new("unwritable");
    scratch.write(&SheetBuilder::new().fill_part1(2, 'C').build());
    let output = scratch_path("no_such_dir", "d").join("out.png");

    let report = Scorer::new(ScorerConfig::default()).score(&scratch.image, &output, "");
    assert_eq!(report.status_code, 1);
    assert_eq!(report.error.as_deref(), Some("Failed to save output image"));

    let doc = report.to_value();
    assert_eq!(doc["answers"]["1"], json!({"2": "C"}));
}

#[test]
fn test_invalid_answer_key_is_ignored() {
    let scratch = Scratch::new("bad_key");
    scratch.write(&SheetBuilder::new().fill_part1(1, 'B').build());
    let json = process_image(&scratch.image, &scratch.output, "{not json");
    let doc: Value = serde_json::from_str(&json).expect("result document is JSON");

    assert_eq!(doc["status_code"], 0);
    assert_eq!(doc["answers"]["1"], json!({"1": "B"}));
}

#[test]
fn test_blocks_in_raster_order() {
    let sheet = SheetBuilder::new();
    let evaluation = Scorer::default().evaluate(sheet.build());

    assert_eq!(evaluation.boxes.len(), 14);
    let layout = sheet.layout();
    for (found, printed) in evaluation.boxes.iter().zip(layout.part1.iter().chain(&layout.part2)) {
        assert!((found.x - printed.x).abs() <= 3, "{found:?} vs {printed:?}");
        assert!((found.y - printed.y).abs() <= 3, "{found:?} vs {printed:?}");
    }
    for (found, printed) in evaluation.boxes[8..].iter().zip(&layout.part3) {
        assert!((found.x - printed.x).abs() <= 3, "{found:?} vs {printed:?}");
    }
}

#[test]
fn test_skewed_sheet_reads_like_level_sheet() {
    let sheet = SheetBuilder::new()
        .fill_part1(1, 'A')
        .fill_part1(12, 'C')
        .fill_part2(2, 'b', true)
        .fill_part3(1, "37");
    let level = Scorer::default()
        .evaluate(sheet.build())
        .outcome
        .expect("level sheet decodes");
    assert_eq!(level.part1.len(), 2);
    assert_eq!(level.part2.len(), 1);
    assert_eq!(level.part3.len(), 1);

    for angle in [2.0, -2.0] {
        let evaluation = Scorer::default().evaluate(rotate(sheet.build(), angle));
        assert_eq!(evaluation.boxes.len(), 14, "skew {angle} deg");
        let answers = evaluation
            .outcome
            .unwrap_or_else(|e| panic!("skew {angle} deg: {e}"));
        assert_eq!(answers, level, "skew {angle} deg");
    }
}

#[test]
fn test_grade_against_key() {
    let sheet = SheetBuilder::new()
        .fill_part1(1, 'A')
        .fill_part1(2, 'B')
        .fill_part2(1, 'a', true)
        .fill_part3(1, "42");
    let key = AnswerKey::parse(
        r#"{"answers": {
            "1": {"1": "A", "2": "C"},
            "2": {"1": {"a": true}},
            "3": {"1": "42"}
        }}"#,
    )
    .expect("valid key");

    let answers = Scorer::default()
        .evaluate(sheet.build())
        .outcome
        .expect("sheet decodes");
    let grade = key.grade(&answers);

    assert_eq!((grade.part1.correct, grade.part1.total), (1, 2));
    assert_eq!((grade.part2.correct, grade.part2.total), (1, 1));
    assert_eq!((grade.part3.correct, grade.part3.total), (1, 1));
    assert_eq!(grade.overall().correct, 3);
}
