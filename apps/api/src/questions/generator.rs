//! Question generation pipeline.
//!
//! Flow: validate input → build request → one generation call → validate output.
//! No retries and no shared state: every invocation stands alone.

use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::GenerationService;
use crate::questions::formatter::build_generation_request;
use crate::questions::models::GenerationResult;
use crate::questions::request::GenerationRequest;
use crate::questions::validator::validate_response;

pub async fn generate_interview_questions(
    service: &dyn GenerationService,
    request: GenerationRequest,
) -> Result<GenerationResult, AppError> {
    let request_id = Uuid::new_v4();

    run_pipeline(service, request)
        .instrument(info_span!("generate_questions", %request_id))
        .await
}

async fn run_pipeline(
    service: &dyn GenerationService,
    request: GenerationRequest,
) -> Result<GenerationResult, AppError> {
    let validated = request.validate()?;
    let format = validated.effective_format();

    info!(
        format = %format,
        skills = validated.skills.entries().len(),
        resume_type = validated.resume.mime_type(),
        resume_bytes = validated.resume.decoded_len(),
        "Generating interview questions"
    );

    let outbound = build_generation_request(&validated);

    let response = service
        .generate(&outbound)
        .await
        .map_err(|e| AppError::ServiceUnavailable(e.to_string()))?;

    let result = validate_response(&response, format)?;

    info!(total = result.total(), "Generated interview questions");

    Ok(result)
}


#[cfg(test)]
mod tests {
    use super::fakes::{FakeService, Reply};
    use super::*;
    use crate::llm_client::models::Part;
    use crate::llm_client::GenerateContentResponse;
    use crate::questions::models::fixtures::{bucket, full_result};
    use crate::questions::resume::{ResumeBlob, MIME_PDF};

    fn pdf_request(skills: &str, format: Option<&str>) -> GenerationRequest {
        GenerationRequest {
            resume: Some(
                ResumeBlob::from_bytes(MIME_PDF, b"%PDF-1.4 senior engineer")
                    .unwrap()
                    .to_data_uri(),
            ),
            skills: Some(skills.to_string()),
            question_format: format.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_scenario_a_theoretical_success() {
        let service =
            FakeService::replying_text(serde_json::to_string(&full_result()).unwrap());

        let result = generate_interview_questions(
            &service,
            pdf_request("React, Node.js", Some("Theoretical")),
        )
        .await
        .unwrap();

        assert_eq!(result, full_result());
        assert_eq!(service.call_count(), 1);

        let sent = service.last_request.lock().unwrap().clone().unwrap();
        let prompt = sent.contents[0].parts[0].as_text().unwrap().to_string();
        assert!(prompt.contains("Skills: React, Node.js"));
        assert!(matches!(sent.contents[0].parts[1], Part::InlineData { .. }));
    }

    #[tokio::test]
    async fn test_scenario_b_empty_skills_never_calls_service() {
        let service = FakeService::replying_text("unused");

        let err = generate_interview_questions(&service, pdf_request("", None))
            .await
            .unwrap_err();

        assert!(matches!(&err, AppError::Validation(msg) if msg == "skills required"));
        assert_eq!(service.call_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_format_never_calls_service() {
        let service = FakeService::replying_text("unused");
        let err = generate_interview_questions(&service, pdf_request("Rust", Some("Oral")))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(service.call_count(), 0);
    }

    #[tokio::test]
    async fn test_scenario_c_empty_output_fails() {
        let service = FakeService::new(Reply::Response(GenerateContentResponse::default()));
        let err = generate_interview_questions(&service, pdf_request("Rust", None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::GenerationFailed(_)));
    }

    #[tokio::test]
    async fn test_scenario_d_short_bucket_fails() {
        let text = serde_json::json!({
            "easy": bucket("e", 5),
            "medium": bucket("m", 4),
            "hard": bucket("h", 5),
        })
        .to_string();
        let service = FakeService::replying_text(text);

        let err = generate_interview_questions(&service, pdf_request("Rust", None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::GenerationFailed(_)));
        assert_eq!(service.call_count(), 1);
    }

    #[tokio::test]
    async fn test_transport_failure_is_service_unavailable_and_not_retried() {
        let service = FakeService::new(Reply::ApiError(429, "quota exceeded".into()));
        let err = generate_interview_questions(&service, pdf_request("Rust", Some("MCQs")))
            .await
            .unwrap_err();
        assert!(matches!(&err, AppError::ServiceUnavailable(msg) if msg.contains("quota")));
        assert_eq!(service.call_count(), 1);
    }
}
