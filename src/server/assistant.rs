//! Conversational assistant behind `chat` replies

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const HARM_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

#[derive(Debug, Error)]
pub enum AssistantError {
    /// The provider refused the prompt
    #[error("Prompt blocked: {0}")]
    Blocked(String),
    #[error("Assistant request failed: {0}")]
    Failed(String),
}

/// Text generator for free-form questions
#[async_trait]
pub trait Assistant: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, AssistantError>;

    fn model_id(&self) -> &str;
}

/// Google Gemini `generateContent` client
pub struct GeminiAssistant {
    client: Client,
    api_key: String,
    model_id: String,
    url: String,
}

impl GeminiAssistant {
    /// `base_url` overrides the public endpoint (gateways, tests)
    pub fn new(
        api_key: String,
        model_id: impl Into<String>,
        base_url: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, AssistantError> {
        let model_id = model_id.into();
        let url = format!(
            "{}/models/{model_id}:generateContent",
            base_url.unwrap_or(GEMINI_BASE_URL).trim_end_matches('/')
        );

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AssistantError::Failed(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            model_id,
            url,
        })
    }

    fn build_request(prompt: &str) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: 0.7,
                top_p: 1.0,
                top_k: 1,
                max_output_tokens: 2048,
            },
            safety_settings: HARM_CATEGORIES
                .iter()
                .map(|category| GeminiSafetySetting {
                    category: (*category).to_string(),
                    threshold: "BLOCK_MEDIUM_AND_ABOVE".to_string(),
                })
                .collect(),
        }
    }

    fn normalize_response(resp: GeminiResponse) -> Result<String, AssistantError> {
        if let Some(reason) = resp.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(AssistantError::Blocked(reason));
        }

        let candidate = resp
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| AssistantError::Failed("No candidates in response".to_string()))?;

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(AssistantError::Failed(format!(
                "Empty candidate (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            )));
        }

        Ok(text)
    }
}

#[async_trait]
impl Assistant for GeminiAssistant {
    async fn generate(&self, prompt: &str) -> Result<String, AssistantError> {
        let request = Self::build_request(prompt);

        let response = self
            .client
            .post(&self.url)
            .query(&[("key", &self.api_key)])
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AssistantError::Failed(format!("Request timeout: {e}"))
                } else {
                    AssistantError::Failed(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AssistantError::Failed(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            let message = serde_json::from_str::<GeminiErrorResponse>(&body)
                .map_or(body, |e| e.error.message);
            return Err(AssistantError::Failed(format!("HTTP {status}: {message}")));
        }

        let gemini_response: GeminiResponse = serde_json::from_str(&body)
            .map_err(|e| AssistantError::Failed(format!("Failed to parse response: {e}")))?;

        Self::normalize_response(gemini_response)
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

/// Logging wrapper for assistants
pub struct LoggingAssistant<A> {
    inner: A,
}

impl<A: Assistant> LoggingAssistant<A> {
    pub fn new(inner: A) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<A: Assistant> Assistant for LoggingAssistant<A> {
    async fn generate(&self, prompt: &str) -> Result<String, AssistantError> {
        let start = std::time::Instant::now();
        let result = self.inner.generate(prompt).await;
        let duration = start.elapsed();

        match &result {
            Ok(text) => tracing::info!(
                model = %self.inner.model_id(),
                duration_ms = %duration.as_millis(),
                prompt_bytes = prompt.len(),
                reply_bytes = text.len(),
                "Assistant request completed"
            ),
            Err(e) => tracing::error!(
                model = %self.inner.model_id(),
                duration_ms = %duration.as_millis(),
                error = %e,
                "Assistant request failed"
            ),
        }

        result
    }

    fn model_id(&self) -> &str {
        self.inner.model_id()
    }
}

// Gemini API types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GeminiGenerationConfig,
    safety_settings: Vec<GeminiSafetySetting>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: i32,
    max_output_tokens: i32,
}

#[derive(Debug, Serialize)]
struct GeminiSafetySetting {
    category: String,
    threshold: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorResponse {
    error: GeminiError,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    message: String,
}
