//! Question format selector: one phrasing strategy per tag.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::questions::prompts::{
    FILL_IN_THE_BLANKS_RULE, MCQ_RULE, THEORETICAL_DIFFICULTY_BIAS, THEORETICAL_RULE,
};

/// Blank marker the model is told to use in fill-in-the-blank questions.
pub const BLANK_MARKER: &str = "________";

/// Minimum number of answer options a multiple-choice question must carry.
pub const MIN_MCQ_OPTIONS: usize = 4;

const OPTION_LABELS: [char; 6] = ['A', 'B', 'C', 'D', 'E', 'F'];

/// The phrasing contract applied to every generated question.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionFormat {
    #[serde(rename = "MCQs")]
    Mcqs,
    #[serde(alias = "Fill in the Blanks")]
    FillInTheBlanks,
    #[default]
    Theoretical,
}

impl QuestionFormat {
    pub const ALL: [QuestionFormat; 3] = [
        QuestionFormat::Mcqs,
        QuestionFormat::FillInTheBlanks,
        QuestionFormat::Theoretical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionFormat::Mcqs => "MCQs",
            QuestionFormat::FillInTheBlanks => "FillInTheBlanks",
            QuestionFormat::Theoretical => "Theoretical",
        }
    }

    /// Prompt instructions for this format.
    pub fn phrasing_instructions(&self) -> String {
        match self {
            QuestionFormat::Mcqs => mcq_instructions(),
            QuestionFormat::FillInTheBlanks => fill_in_the_blanks_instructions(),
            QuestionFormat::Theoretical => theoretical_instructions(),
        }
    }

    /// Whether a question follows this format's phrasing contract.
    ///
    /// The model is only instructed, never forced, so this is advisory.
    pub fn follows_phrasing(&self, question: &str) -> bool {
        match self {
            QuestionFormat::Mcqs => count_option_markers(question) >= MIN_MCQ_OPTIONS,
            QuestionFormat::FillInTheBlanks => count_blank_markers(question) == 1,
            QuestionFormat::Theoretical => true,
        }
    }
}

impl fmt::Display for QuestionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "MCQs" => Ok(QuestionFormat::Mcqs),
            "FillInTheBlanks" | "Fill in the Blanks" => Ok(QuestionFormat::FillInTheBlanks),
            "Theoretical" => Ok(QuestionFormat::Theoretical),
            other => Err(format!(
                "invalid questionFormat '{other}': expected one of {}",
                QuestionFormat::ALL
                    .iter()
                    .map(QuestionFormat::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

fn mcq_instructions() -> String {
    MCQ_RULE.replace("{min_options}", &MIN_MCQ_OPTIONS.to_string())
}

fn fill_in_the_blanks_instructions() -> String {
    FILL_IN_THE_BLANKS_RULE.replace("{blank}", BLANK_MARKER)
}

fn theoretical_instructions() -> String {
    format!("{THEORETICAL_RULE}\n\n{THEORETICAL_DIFFICULTY_BIAS}")
}

/// Counts distinct option labels (`A)`, `B.`, `(C)`, `D:`) present in a question.
pub fn count_option_markers(question: &str) -> usize {
    OPTION_LABELS
        .iter()
        .filter(|label| {
            [
                format!("{label})"),
                format!("{label}."),
                format!("({label})"),
                format!("{label}:"),
            ]
            .iter()
            .any(|marker| has_marker_at_word_start(question, marker))
        })
        .count()
}

pub fn count_blank_markers(question: &str) -> usize {
    let mut count = 0;
    let mut in_blank = false;
    let mut run = 0;
    for c in question.chars() {
        if c == '_' {
            run += 1;
            if run >= 3 && !in_blank {
                in_blank = true;
                count += 1;
            }
        } else {
            run = 0;
            in_blank = false;
        }
    }
    count
}

fn has_marker_at_word_start(text: &str, marker: &str) -> bool {
    text.match_indices(marker).any(|(idx, _)| {
        text[..idx]
            .chars()
            .next_back()
            .map_or(true, |prev| !prev.is_alphanumeric())
    })
}
