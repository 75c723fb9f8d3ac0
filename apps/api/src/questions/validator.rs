//! Response Validator. The caller only ever sees a well-formed 5/5/5 result or a failure.
//!
//! The generation service is untrusted: output may be absent, blocked, cut off,
//! or shaped differently from the declared schema. None of that is repaired
//! here; any deviation fails the whole batch.

use thiserror::Error;
use tracing::{error, warn};

use crate::errors::AppError;
use crate::llm_client::models::GenerateContentResponse;
use crate::llm_client::strip_json_fences;
use crate::questions::format::QuestionFormat;
use crate::questions::models::{Difficulty, GenerationResult, QUESTIONS_PER_DIFFICULTY};

/// The only finish reason that counts as success.
const FINISH_REASON_STOP: &str = "STOP";

/// Candidate text longer than this is truncated in logs.
const LOG_PREVIEW_CHARS: usize = 500;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaViolation {
    #[error("output is empty")]
    Empty,

    #[error("output is not a JSON object with easy/medium/hard string arrays: {0}")]
    Shape(String),

    #[error("'{}' has {} questions, expected {}", .0.as_str(), .1, QUESTIONS_PER_DIFFICULTY)]
    WrongCount(Difficulty, usize),
}

/// Validates the raw service response for a request in `format`.
pub fn validate_response(
    response: &GenerateContentResponse,
    format: QuestionFormat,
) -> Result<GenerationResult, AppError> {
    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.as_deref())
    {
        error!(block_reason = reason, "Prompt was blocked by the generation service");
        return Err(AppError::GenerationFailed(format!(
            "prompt blocked, block reason: {reason}"
        )));
    }

    let Some(candidate) = response.candidates.first() else {
        error!("Generation service returned no candidates");
        return Err(AppError::GenerationFailed(
            "no candidates returned, finish reason: none".to_string(),
        ));
    };

    let finish_reason = candidate.finish_reason.as_deref();
    let text = candidate.text();

    if let Some(reason) = finish_reason.filter(|r| *r != FINISH_REASON_STOP) {
        error!(
            finish_reason = reason,
            candidate = %preview(text.as_deref().unwrap_or_default()),
            "Generation did not finish normally"
        );
        return Err(AppError::GenerationFailed(format!("finish reason: {reason}")));
    }

    let text = text.unwrap_or_default();
    let result = parse_question_sets(&text).map_err(|violation| {
        error!(
            finish_reason = finish_reason.unwrap_or("none"),
            candidate = %preview(&text),
            "Generated output failed schema validation: {violation}"
        );
        AppError::GenerationFailed(format!(
            "{violation} (finish reason: {})",
            finish_reason.unwrap_or("none")
        ))
    })?;

    warn_on_phrasing_drift(&result, format);

    Ok(result)
}

/// Parses model text into a `GenerationResult`, enforcing exactly
/// `easy`/`medium`/`hard` string arrays of `QUESTIONS_PER_DIFFICULTY` each.
pub fn parse_question_sets(text: &str) -> Result<GenerationResult, SchemaViolation> {
    let text = strip_json_fences(text);
    if text.is_empty() || text == "null" {
        return Err(SchemaViolation::Empty);
    }

    let result: GenerationResult =
        serde_json::from_str(text).map_err(|e| SchemaViolation::Shape(e.to_string()))?;

    if let Some((difficulty, actual)) = result.bucket_size_violation() {
        return Err(SchemaViolation::WrongCount(difficulty, actual));
    }

    Ok(result)
}

fn warn_on_phrasing_drift(result: &GenerationResult, format: QuestionFormat) {
    let drifted = result
        .iter()
        .filter(|(_, question)| !format.follows_phrasing(question))
        .count();

    if drifted > 0 {
        warn!(
            format = %format,
            drifted,
            total = result.total(),
            "Generated questions do not follow the requested phrasing"
        );
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() <= LOG_PREVIEW_CHARS {
        text.to_string()
    } else {
        let head: String = text.chars().take(LOG_PREVIEW_CHARS).collect();
        format!("{head}…")
    }
}
