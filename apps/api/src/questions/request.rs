//! Caller-facing request types and their validation.
//!
//! Validation runs before any external call. A request that fails here never
//! reaches the generation service.

use serde::Deserialize;

use crate::errors::AppError;
use crate::questions::format::QuestionFormat;
use crate::questions::resume::{ResumeBlob, ResumeError};

/// Request body for question generation.
///
/// `questionFormat` arrives as a raw string so an unknown value is reported as
/// a validation error instead of a deserialization rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    #[serde(default, alias = "resumeDataUri")]
    pub resume: Option<String>,
    #[serde(default)]
    pub skills: Option<String>,
    #[serde(default)]
    pub question_format: Option<String>,
}

/// Comma-delimited skills, kept verbatim for the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillList {
    raw: String,
    entries: Vec<String>,
}

impl SkillList {
    /// Returns `None` when no entry contains a non-whitespace character.
    pub fn parse(raw: &str) -> Option<Self> {
        let entries: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        if entries.is_empty() {
            return None;
        }

        Some(Self {
            raw: raw.to_string(),
            entries,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

/// A request that passed every input check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub resume: ResumeBlob,
    pub skills: SkillList,
    /// `None` means the caller did not choose; the theoretical strategy applies.
    pub format: Option<QuestionFormat>,
}

impl ValidatedRequest {
    pub fn effective_format(&self) -> QuestionFormat {
        self.format.unwrap_or_default()
    }
}

impl From<ResumeError> for AppError {
    fn from(e: ResumeError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl GenerationRequest {
    pub fn validate(&self) -> Result<ValidatedRequest, AppError> {
        let resume = ResumeBlob::parse(self.resume.as_deref().unwrap_or_default())?;

        let skills = self
            .skills
            .as_deref()
            .and_then(SkillList::parse)
            .ok_or_else(|| AppError::Validation("skills required".to_string()))?;

        let format = match self.question_format.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<QuestionFormat>().map_err(AppError::Validation)?),
        };

        Ok(ValidatedRequest {
            resume,
            skills,
            format,
        })
    }
}
