/// Multiple-choice answer from part 1
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part1Answer {
    /// Question number, 1-40
    pub question: u32,
    /// Chosen letter, A-D
    pub letter: char,
}

/// One yes/no statement answered in part 2
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part2Answer {
    /// Question number, 1-8
    pub question: u32,
    /// Statement label, a-d
    pub sub_label: char,
    /// `true` for the "yes" column
    pub choice: bool,
}

/// Numeric code written in part 3
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part3Answer {
    /// Question number, 1-6
    pub question: u32,
    /// Concatenated symbols, left to right
    pub code: String,
}

/// Everything read from one sheet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetAnswers {
    /// Part 1 answers in question order
    pub part1: Vec<Part1Answer>,
    /// Part 2 answers in (question-as-string, sub-label) order
    pub part2: Vec<Part2Answer>,
    /// Part 3 answers in block order
    pub part3: Vec<Part3Answer>,
}

impl SheetAnswers {
    /// Total number of answers across all parts
    pub fn len(&self) -> usize {
        self.part1.len() + self.part2.len() + self.part3.len()
    }

    /// True when nothing was marked anywhere on the sheet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
