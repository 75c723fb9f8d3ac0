// All LLM prompt constants for the Questions module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System instruction persona. `llm_client::prompts::JSON_ONLY_SYSTEM` is appended.
pub const QUESTION_GENERATOR_SYSTEM: &str = "You are an expert technical interviewer and \
    interview question generator. You write clear, specific questions that assess a \
    candidate's real knowledge and experience.";

/// Question generation prompt template. The resume travels as an inline
/// attachment in the same message, directly after this text.
/// Replace: {per_bucket}, {total}, {skills}, {format}, {format_rules}
pub const QUESTION_PROMPT_TEMPLATE: &str = r#"Based on the attached resume and the selected skills, generate a list of {total} interview questions in the specified format, categorized by difficulty.

You MUST generate exactly {per_bucket} easy, {per_bucket} medium, and {per_bucket} hard questions.

Skills: {skills}
Question Format: {format}

The questions should be relevant to the resume and skills, and designed to assess the candidate's knowledge and experience.

FORMAT RULES:
{format_rules}

Return ONLY a JSON object with three keys: "easy", "medium", and "hard", where each key holds an array of {per_bucket} question strings."#;

/// Phrasing rule for multiple-choice questions. Replace: {min_options}
pub const MCQ_RULE: &str = "Every question MUST be a multiple choice question with at least \
    {min_options} distinct answer options, exactly one of which is correct. Format each as the \
    question followed by its options labelled A), B), C), D) within the same string.";

/// Phrasing rule for fill-in-the-blank questions. Replace: {blank}
pub const FILL_IN_THE_BLANKS_RULE: &str = "Every question MUST be a single sentence in which \
    exactly one key term or concept is replaced by '{blank}'. For example: \"In React, the \
    '{blank}' hook is used to manage state in a functional component.\"";

pub const THEORETICAL_RULE: &str = "Every question MUST be a standard open-ended theoretical \
    question. Do not include answer options or blanks.";

pub const THEORETICAL_DIFFICULTY_BIAS: &str = "DIFFICULTY FOCUS:\n\
    - easy: foundational knowledge of the stated skills\n\
    - medium: specifics drawn from the projects and experience in the resume\n\
    - hard: advanced, architectural, and design-level knowledge of the stated skills";
