//! Request Formatter: turns a validated request into one Gemini request.
//!
//! Pure: no I/O, no clock, no randomness. Identical inputs give identical output.

use serde_json::{json, Value};

use crate::llm_client::models::{
    Blob, Content, GenerateContentRequest, GenerationConfig, HarmBlockThreshold, HarmCategory,
    Part, SafetySetting,
};
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::questions::models::{Difficulty, QUESTIONS_PER_DIFFICULTY};
use crate::questions::prompts::{QUESTION_GENERATOR_SYSTEM, QUESTION_PROMPT_TEMPLATE};
use crate::questions::request::ValidatedRequest;

pub fn build_generation_request(request: &ValidatedRequest) -> GenerateContentRequest {
    let prompt = build_prompt(request);

    GenerateContentRequest {
        contents: vec![Content::user_parts(vec![
            Part::Text { text: prompt },
            Part::InlineData {
                inline_data: Blob {
                    mime_type: request.resume.mime_type().to_string(),
                    data: request.resume.encoded().to_string(),
                },
            },
        ])],
        system_instruction: Some(Content::system_text(format!(
            "{QUESTION_GENERATOR_SYSTEM} {JSON_ONLY_SYSTEM}"
        ))),
        generation_config: Some(GenerationConfig {
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(response_schema()),
        }),
        safety_settings: permissive_safety_settings(),
    }
}

fn build_prompt(request: &ValidatedRequest) -> String {
    let format = request.effective_format();

    QUESTION_PROMPT_TEMPLATE
        .replace("{total}", &(QUESTIONS_PER_DIFFICULTY * Difficulty::ALL.len()).to_string())
        .replace("{per_bucket}", &QUESTIONS_PER_DIFFICULTY.to_string())
        .replace("{format_rules}", &format.phrasing_instructions())
        .replace("{format}", format.as_str())
        // Last, so braces inside caller text are never treated as placeholders.
        .replace("{skills}", request.skills.raw())
}

/// Declared output shape: three required string arrays of fixed length.
pub fn response_schema() -> Value {
    let bucket = |difficulty: Difficulty| {
        json!({
            "type": "ARRAY",
            "description": format!(
                "Exactly {QUESTIONS_PER_DIFFICULTY} {} difficulty questions.",
                difficulty.as_str()
            ),
            "items": {"type": "STRING"},
            "minItems": QUESTIONS_PER_DIFFICULTY,
            "maxItems": QUESTIONS_PER_DIFFICULTY,
        })
    };

    json!({
        "type": "OBJECT",
        "properties": {
            "easy": bucket(Difficulty::Easy),
            "medium": bucket(Difficulty::Medium),
            "hard": bucket(Difficulty::Hard),
        },
        "required": ["easy", "medium", "hard"],
        "propertyOrdering": ["easy", "medium", "hard"],
    })
}

/// Technical interview content trips harm filters spuriously ("kill a process",
/// "exploit", "attack surface"), so every category is set to BLOCK_NONE.
fn permissive_safety_settings() -> Vec<SafetySetting> {
    HarmCategory::ALL
        .into_iter()
        .map(|category| SafetySetting {
            category,
            threshold: HarmBlockThreshold::BlockNone,
        })
        .collect()
}
