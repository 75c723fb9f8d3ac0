//! Axum route handlers for the Questions API.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
        Multipart, State,
    },
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::questions::export::render_plain_text;
use crate::questions::generator::generate_interview_questions;
use crate::questions::models::{GenerationResult, QuestionsResponse, QUESTIONS_PER_DIFFICULTY};
use crate::questions::request::{GenerationRequest, SkillList};
use crate::questions::resume::{mime_type_for_filename, ResumeBlob, ACCEPTED_MIME_TYPES};
use crate::routes::MAX_REQUEST_BYTES;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub skills: String,
    pub questions: GenerationResult,
}

fn body_rejection(rejection: JsonRejection) -> AppError {
    AppError::Validation(rejection.body_text())
}

fn multipart_rejection(rejection: MultipartRejection) -> AppError {
    AppError::Validation(format!("invalid multipart body: {}", rejection.body_text()))
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge(format!(
            "upload exceeds the {} MiB request limit",
            MAX_REQUEST_BYTES / (1024 * 1024)
        ));
    }
    AppError::Validation(format!("invalid multipart body: {}", e.body_text()))
}

/// POST /api/v1/questions
///
/// Body: `{resume, skills, questionFormat?}` with `resume` as a base64 data URI.
pub async fn handle_generate(
    State(state): State<AppState>,
    body: Result<Json<GenerationRequest>, JsonRejection>,
) -> Result<Json<QuestionsResponse>, AppError> {
    let Json(request) = body.map_err(body_rejection)?;

    let questions = generate_interview_questions(state.llm.as_ref(), request).await?;

    Ok(Json(questions.into()))
}

/// POST /api/v1/questions/upload
///
/// Multipart form: `resume` (file), `skills`, optional `questionFormat`.
/// The file is encoded to a data URI here and then goes through the same
/// pipeline as the JSON endpoint.
pub async fn handle_upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<QuestionsResponse>, AppError> {
    let mut multipart = multipart.map_err(multipart_rejection)?;
    let mut request = GenerationRequest::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" | "resumeFile" => {
                let mime_type = upload_mime_type(field.content_type(), field.file_name());
                let bytes = field.bytes().await.map_err(multipart_error)?;
                let blob = ResumeBlob::from_bytes(&mime_type, &bytes)?;
                request.resume = Some(blob.to_data_uri());
            }
            "skills" => {
                request.skills = Some(field.text().await.map_err(multipart_error)?);
            }
            "questionFormat" => {
                request.question_format = Some(field.text().await.map_err(multipart_error)?);
            }
            _ => {}
        }
    }

    let questions = generate_interview_questions(state.llm.as_ref(), request).await?;

    Ok(Json(questions.into()))
}

/// POST /api/v1/questions/export
///
/// Returns the 15 questions as a numbered plain-text document.
pub async fn handle_export(
    body: Result<Json<ExportRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = body.map_err(body_rejection)?;

    if SkillList::parse(&request.skills).is_none() {
        return Err(AppError::Validation("skills required".to_string()));
    }
    if let Some((difficulty, actual)) = request.questions.bucket_size_violation() {
        return Err(AppError::Validation(format!(
            "'{}' must hold exactly {QUESTIONS_PER_DIFFICULTY} questions, got {actual}",
            difficulty.as_str()
        )));
    }

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        render_plain_text(&request.skills, &request.questions),
    ))
}

/// Declared content type when it is one we accept, else inferred from the file name.
fn upload_mime_type(content_type: Option<&str>, file_name: Option<&str>) -> String {
    let declared = content_type
        .map(|ct| ct.split(';').next().unwrap_or_default().trim().to_ascii_lowercase())
        .filter(|ct| !ct.is_empty());

    match declared {
        Some(ct) if ACCEPTED_MIME_TYPES.contains(&ct.as_str()) => ct,
        declared => file_name
            .and_then(mime_type_for_filename)
            .map(str::to_string)
            .or(declared)
            .unwrap_or_default(),
    }
}
