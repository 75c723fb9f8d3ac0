// Interview question generation.
// Implements: input validation, prompt formatting, the single Gemini call,
// response schema validation, upload handling and plain-text export.
// All model calls go through llm_client, never direct HTTP calls here.

pub mod export;
pub mod format;
pub mod formatter;
pub mod generator;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod request;
pub mod resume;
pub mod validator;
