/// LLM Client — the single point of entry for all Gemini API calls.
///
/// ARCHITECTURAL RULE: No other module may call the Gemini API directly.
/// Callers depend on the `GenerationService` trait so tests can inject a fake.
///
/// One request, one response: there is no retry loop here.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::config::Config;

pub mod models;
pub mod prompts;

pub use models::{GenerateContentRequest, GenerateContentResponse};

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// "Submit structured request → structured response or failure".
///
/// Carried in `AppState` as `Arc<dyn GenerationService>`.
#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn generate(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, LlmError>;
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// Gemini `generateContent` client.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    model: String,
    api_base: String,
}

impl LlmClient {
    pub fn new(
        api_key: String,
        model: String,
        api_base: String,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            model,
            api_base,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, LlmError> {
        Self::new(
            config.gemini_api_key.clone(),
            config.gemini_model.clone(),
            config.gemini_api_base.clone(),
            config.llm_timeout,
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base, self.model
        )
    }
}

#[async_trait]
impl GenerationService for LlmClient {
    async fn generate(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, LlmError> {
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;

        if let Some(usage) = &parsed.usage_metadata {
            debug!(
                "LLM call succeeded: prompt_tokens={}, candidate_tokens={}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        Ok(parsed)
    }
}

/// Extracts `error.message` from a Gemini error body, falling back to the raw body.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<GeminiError>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string())
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));
    match inner {
        Some(stripped) => stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start()),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::Path,
        http::{HeaderMap, StatusCode},
        routing::post,
        Json, Router,
    };
    use serde_json::{json, Value};

    use super::*;
    use crate::errors::AppError;
    use crate::llm_client::models::{Content, Part};
    use crate::questions::generator::generate_interview_questions;
    use crate::questions::models::fixtures::full_result;
    use crate::questions::request::GenerationRequest;
    use crate::questions::resume::{ResumeBlob, MIME_PDF};

    #[derive(Debug, Default)]
    struct Captured {
        model: Option<String>,
        api_key: Option<String>,
        body: Option<Value>,
    }

    /// Serves `POST /v1beta/models/:model` on an ephemeral port with a fixed reply.
    async fn spawn_gemini_stub(
        status: StatusCode,
        reply: String,
    ) -> (String, Arc<Mutex<Captured>>) {
        let captured = Arc::new(Mutex::new(Captured::default()));
        let seen = captured.clone();
        let app = Router::new().route(
            "/v1beta/models/:model",
            post(
                move |Path(model): Path<String>, headers: HeaderMap, Json(body): Json<Value>| async move {
                    {
                        let mut seen = seen.lock().unwrap();
                        seen.model = Some(model);
                        seen.api_key = headers
                            .get("x-goog-api-key")
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string);
                        seen.body = Some(body);
                    }
                    (status, reply)
                },
            ),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{addr}"), captured)
    }

    fn client_for(api_base: String) -> LlmClient {
        LlmClient::new(
            "test-key".into(),
            "gemini-test".into(),
            api_base,
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn hello_request() -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content::user_parts(vec![Part::Text {
                text: "hello".into(),
            }])],
            system_instruction: None,
            generation_config: None,
            safety_settings: Vec::new(),
        }
    }

    fn gemini_reply(text: &str) -> String {
        json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": text}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 10, "candidatesTokenCount": 20}
        })
        .to_string()
    }

    const INVALID_KEY_BODY: &str = r#"{"error": {"code": 403, "message": "API key not valid", "status": "PERMISSION_DENIED"}}"#;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "  {\"key\": \"value\"}\n";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_api_error_message_parsed() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT"}}"#;
        assert_eq!(api_error_message(body), "API key not valid");
    }

    #[test]
    fn test_api_error_message_falls_back_to_body() {
        assert_eq!(api_error_message("upstream timeout"), "upstream timeout");
    }

    #[test]
    fn test_endpoint_includes_model() {
        let client = LlmClient::new(
            "key".into(),
            "gemini-2.0-flash".into(),
            "http://localhost:9000".into(),
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(
            client.endpoint(),
            "http://localhost:9000/v1beta/models/gemini-2.0-flash:generateContent"
        );
        assert_eq!(client.model(), "gemini-2.0-flash");
    }

    #[tokio::test]
    async fn test_generate_posts_to_model_with_api_key() {
        let (base, captured) = spawn_gemini_stub(StatusCode::OK, gemini_reply("hi there")).await;

        let response = client_for(base).generate(&hello_request()).await.unwrap();
        assert_eq!(response.candidates[0].text().as_deref(), Some("hi there"));

        let seen = captured.lock().unwrap();
        assert_eq!(seen.model.as_deref(), Some("gemini-test:generateContent"));
        assert_eq!(seen.api_key.as_deref(), Some("test-key"));
        assert_eq!(
            seen.body.as_ref().unwrap()["contents"][0]["parts"][0]["text"],
            "hello"
        );
    }

    #[tokio::test]
    async fn test_generate_maps_error_status_to_api_error() {
        let (base, _) =
            spawn_gemini_stub(StatusCode::FORBIDDEN, INVALID_KEY_BODY.to_string()).await;

        let err = client_for(base).generate(&hello_request()).await.unwrap_err();
        match err {
            LlmError::Api { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "API key not valid");
            }
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_generate_rejects_unparseable_success_body() {
        let (base, _) =
            spawn_gemini_stub(StatusCode::OK, "<html>gateway</html>".to_string()).await;

        let err = client_for(base).generate(&hello_request()).await.unwrap_err();
        assert!(matches!(err, LlmError::Parse(_)));
    }

    fn pdf_request() -> GenerationRequest {
        GenerationRequest {
            resume: Some(
                ResumeBlob::from_bytes(MIME_PDF, b"%PDF-1.4 resume")
                    .unwrap()
                    .to_data_uri(),
            ),
            skills: Some("Rust, Tokio".to_string()),
            question_format: None,
        }
    }

    #[tokio::test]
    async fn test_pipeline_over_http_returns_questions() {
        let text = serde_json::to_string(&full_result()).unwrap();
        let (base, captured) = spawn_gemini_stub(StatusCode::OK, gemini_reply(&text)).await;

        let result = generate_interview_questions(&client_for(base), pdf_request())
            .await
            .unwrap();
        assert_eq!(result, full_result());

        let seen = captured.lock().unwrap();
        let body = seen.body.as_ref().unwrap();
        assert_eq!(
            body["contents"][0]["parts"][1]["inlineData"]["mimeType"],
            MIME_PDF
        );
    }

    #[tokio::test]
    async fn test_pipeline_over_http_maps_api_error_to_service_unavailable() {
        let (base, _) =
            spawn_gemini_stub(StatusCode::FORBIDDEN, INVALID_KEY_BODY.to_string()).await;

        let err = generate_interview_questions(&client_for(base), pdf_request())
            .await
            .unwrap_err();
        assert!(matches!(
            &err,
            AppError::ServiceUnavailable(msg) if msg.contains("API key not valid")
        ));
        assert!(!err.public_message().contains("API key"));
    }
}
