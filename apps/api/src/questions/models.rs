use serde::{Deserialize, Serialize};

/// Every difficulty bucket holds exactly this many questions.
pub const QUESTIONS_PER_DIFFICULTY: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

/// Fifteen questions in three difficulty buckets of five.
///
/// Unknown keys are rejected on deserialization; bucket sizes are checked
/// separately by `bucket_size_violation`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerationResult {
    pub easy: Vec<String>,
    pub medium: Vec<String>,
    pub hard: Vec<String>,
}

impl GenerationResult {
    pub fn bucket(&self, difficulty: Difficulty) -> &[String] {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }

    pub fn total(&self) -> usize {
        self.easy.len() + self.medium.len() + self.hard.len()
    }

    /// All questions in easy → medium → hard order.
    pub fn iter(&self) -> impl Iterator<Item = (Difficulty, &str)> {
        Difficulty::ALL.into_iter().flat_map(move |difficulty| {
            self.bucket(difficulty)
                .iter()
                .map(move |q| (difficulty, q.as_str()))
        })
    }

    /// First bucket whose size is not `QUESTIONS_PER_DIFFICULTY`, with its actual size.
    pub fn bucket_size_violation(&self) -> Option<(Difficulty, usize)> {
        Difficulty::ALL
            .into_iter()
            .map(|d| (d, self.bucket(d).len()))
            .find(|(_, len)| *len != QUESTIONS_PER_DIFFICULTY)
    }
}

/// Success envelope returned to callers. Failures use `AppError`'s envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionsResponse {
    pub success: bool,
    pub questions: GenerationResult,
}

impl From<GenerationResult> for QuestionsResponse {
    fn from(questions: GenerationResult) -> Self {
        Self {
            success: true,
            questions,
        }
    }
}
