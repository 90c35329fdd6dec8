//! Answer-key parsing and grading
//!
//! The key uses the same shape as the `answers` object of a result
//! document, wrapped in a top-level `answers` field. Parts may be missing.
use std::collections::BTreeMap;

use serde::Deserialize;

use crate::decoder::part3::MAX_CODE_LEN;
use crate::decoder::tables::{PART1_LETTERS, PART2_SUB_LABELS, part3_row};
use crate::error::KeyError;
use crate::models::{Part, SheetAnswers};

const PART1_QUESTIONS: u32 = 40;
const PART2_QUESTIONS: u32 = 8;
const PART3_QUESTIONS: u32 = 6;

#[derive(Debug, Default, Deserialize)]
struct KeyDocument {
    #[serde(default)]
    answers: RawAnswers,
}

#[derive(Debug, Default, Deserialize)]
struct RawAnswers {
    #[serde(rename = "1", default)]
    part1: BTreeMap<String, String>,
    #[serde(rename = "2", default)]
    part2: BTreeMap<String, BTreeMap<String, bool>>,
    #[serde(rename = "3", default)]
    part3: BTreeMap<String, String>,
}

/// Validated correct answers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerKey {
    /// Question to letter
    pub part1: BTreeMap<u32, char>,
    /// Question to statement label to yes/no
    pub part2: BTreeMap<u32, BTreeMap<char, bool>>,
    /// Question to code
    pub part3: BTreeMap<u32, String>,
}

/// Correct items out of the items in the key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    /// Items answered as the key says
    pub correct: usize,
    /// Items in the key
    pub total: usize,
}

impl Tally {
    fn add(&mut self, correct: bool) {
        self.total += 1;
        if correct {
            self.correct += 1;
        }
    }
}

/// Per-part grading result
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Grade {
    /// One item per question
    pub part1: Tally,
    /// One item per statement
    pub part2: Tally,
    /// One item per code
    pub part3: Tally,
}

impl Grade {
    /// Sum over all parts
    pub fn overall(&self) -> Tally {
        Tally {
            correct: self.part1.correct + self.part2.correct + self.part3.correct,
            total: self.part1.total + self.part2.total + self.part3.total,
        }
    }
}

fn question_number(part: Part, key: &str, max: u32) -> Result<u32, KeyError> {
    key.trim()
        .parse::<u32>()
        .ok()
        .filter(|q| (1..=max).contains(q))
        .ok_or_else(|| KeyError::QuestionOutOfRange {
            part,
            question: key.to_string(),
        })
}

fn single_char(value: &str) -> Option<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

impl AnswerKey {
    /// Parse and validate a key document
    pub fn parse(json: &str) -> Result<Self, KeyError> {
        let document: KeyDocument = serde_json::from_str(json)?;
        let raw = document.answers;
        let mut key = AnswerKey::default();

        for (q, value) in &raw.part1 {
            let question = question_number(Part::Part1, q, PART1_QUESTIONS)?;
            let letter = single_char(value)
                .filter(|c| PART1_LETTERS.contains(c))
                .ok_or_else(|| KeyError::InvalidLetter {
                    part: Part::Part1,
                    question,
                    value: value.clone(),
                })?;
            key.part1.insert(question, letter);
        }

        for (q, statements) in &raw.part2 {
            let question = question_number(Part::Part2, q, PART2_QUESTIONS)?;
            let mut parsed = BTreeMap::new();
            for (label, choice) in statements {
                let sub = single_char(label)
                    .filter(|c| PART2_SUB_LABELS.contains(c))
                    .ok_or_else(|| KeyError::InvalidSubLabel {
                        part: Part::Part2,
                        question,
                        value: label.clone(),
                    })?;
                parsed.insert(sub, *choice);
            }
            key.part2.insert(question, parsed);
        }

        for (q, code) in &raw.part3 {
            let question = question_number(Part::Part3, q, PART3_QUESTIONS)?;
            let valid = !code.is_empty()
                && code.chars().count() <= MAX_CODE_LEN
                && code.chars().all(|c| part3_row(c).is_some());
            if !valid {
                return Err(KeyError::InvalidCode {
                    part: Part::Part3,
                    question,
                    value: code.clone(),
                });
            }
            key.part3.insert(question, code.clone());
        }

        Ok(key)
    }

    /// Number of gradable items
    pub fn len(&self) -> usize {
        self.part1.len() + self.part2.values().map(BTreeMap::len).sum::<usize>() + self.part3.len()
    }

    /// True when the key holds nothing to grade
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Compare a read sheet against the key
    ///
    /// A Part 1 question only counts when exactly the keyed letter is marked.
    /// Repeated Part 2 statements use the last reading, as the result
    /// document does.
    pub fn grade(&self, sheet: &SheetAnswers) -> Grade {
        let mut grade = Grade::default();

        for (&question, &letter) in &self.part1 {
            let mut marked = sheet.part1.iter().filter(|a| a.question == question);
            let correct = matches!(
                (marked.next(), marked.next()),
                (Some(a), None) if a.letter == letter
            );
            grade.part1.add(correct);
        }

        for (&question, statements) in &self.part2 {
            for (&sub, &choice) in statements {
                let read = sheet
                    .part2
                    .iter()
                    .filter(|a| a.question == question && a.sub_label == sub)
                    .last()
                    .map(|a| a.choice);
                grade.part2.add(read == Some(choice));
            }
        }

        for (&question, code) in &self.part3 {
            let read = sheet.part3.iter().find(|a| a.question == question);
            grade.part3.add(read.is_some_and(|a| &a.code == code));
        }

        grade
    }
}
