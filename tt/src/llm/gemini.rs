//! Gemini API client implementation
//!
//! Implements the CompletionClient trait for Google's generateContent API.
//! The request shape mirrors what the app has always sent: the context
//! string as a user/model primer turn pair, recent history mapped to
//! user/model roles, and the current message last.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{CompletionClient, CompletionRequest, CompletionResponse, LlmError, Sender};
use crate::config::LlmConfig;

/// Maximum number of retries for transient errors
const MAX_RETRIES: u32 = 3;

/// Initial backoff delay for retries
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 429 | 500 | 502 | 503 | 504 | 529)
}

/// Gemini generateContent API client
pub struct GeminiClient {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
    max_tokens: u32,
}

impl GeminiClient {
    /// Create a new client from configuration
    ///
    /// Reads the API key from the environment variable or file specified in
    /// config.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        debug!(model = %config.model, "from_config: called");
        let api_key = config
            .get_api_key()
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(LlmError::Network)?;

        Ok(Self {
            model: config.model.clone(),
            api_key,
            base_url: config.base_url.clone(),
            http,
            max_tokens: config.max_tokens,
        })
    }

    /// Build the request body for the generateContent API
    fn build_request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        debug!(%self.model, history_len = request.history.len(), "build_request_body: called");
        let mut contents = Vec::new();

        // Context primer: a user turn carrying the role description and a
        // canned model acknowledgement
        if !request.context.is_empty() {
            contents.push(gemini_turn("user", &request.context));
            contents.push(gemini_turn(
                "model",
                "I'll help you manage your tasks as requested. I'll be concise and practical.",
            ));
        }

        // Recent history, oldest first
        for entry in &request.history {
            let role = match entry.sender {
                Sender::User => "user",
                Sender::Bot => "model",
            };
            contents.push(gemini_turn(role, &entry.text));
        }

        // The current message goes last
        contents.push(gemini_turn("user", &request.message));

        serde_json::json!({
            "contents": contents,
            "generationConfig": {
                "temperature": 0.7,
                "topK": 40,
                "topP": 0.95,
                "maxOutputTokens": self.max_tokens,
            },
        })
    }

    /// Extract the reply text from a generateContent response
    fn parse_response(&self, api_response: GeminiResponse) -> Result<CompletionResponse, LlmError> {
        let text = api_response
            .candidates
            .into_iter()
            .flatten()
            .next()
            .and_then(|c| c.content)
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.text)
            .ok_or_else(|| {
                debug!("parse_response: no text candidate in response");
                LlmError::InvalidResponse("No text candidate in Gemini response".to_string())
            })?;

        debug!(text_len = text.len(), "parse_response: success");
        Ok(CompletionResponse {
            text,
            task_suggestions: None,
        })
    }
}

fn gemini_turn(role: &str, text: &str) -> serde_json::Value {
    serde_json::json!({
        "role": role,
        "parts": [{ "text": text }],
    })
}

#[async_trait]
impl CompletionClient for GeminiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        debug!(%self.model, "complete: called");
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );
        let body = self.build_request_body(&request);

        let mut last_error = None;
        for attempt in 0..=MAX_RETRIES {
            if attempt > 0 {
                let backoff = INITIAL_BACKOFF_MS * 2u64.pow(attempt - 1);
                warn!(attempt, backoff_ms = backoff, "complete: retrying after transient error");
                tokio::time::sleep(Duration::from_millis(backoff)).await;
            }

            let response = match self.http.post(url.clone()).json(&body).send().await {
                Ok(r) => r,
                Err(e) => {
                    debug!(attempt, error = %e, "complete: network error");
                    last_error = Some(LlmError::Network(e));
                    continue;
                }
            };

            let status = response.status().as_u16();

            if is_retryable_status(status) && attempt < MAX_RETRIES {
                let text = response.text().await.unwrap_or_default();
                debug!(attempt, status, "complete: retryable error");
                last_error = Some(LlmError::ApiError { status, message: text });
                continue;
            }

            if !response.status().is_success() {
                debug!(%status, "complete: API error");
                let message = response
                    .text()
                    .await
                    .ok()
                    .and_then(|text| {
                        serde_json::from_str::<GeminiErrorBody>(&text)
                            .ok()
                            .map(|b| b.error.message)
                            .or(Some(text))
                    })
                    .unwrap_or_default();
                return Err(LlmError::ApiError { status, message });
            }

            debug!("complete: success");
            let api_response: GeminiResponse = response.json().await.map_err(LlmError::Network)?;
            return self.parse_response(api_response);
        }

        Err(last_error.unwrap_or_else(|| LlmError::InvalidResponse("Max retries exceeded".to_string())))
    }
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    error: GeminiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::HistoryEntry;
    use chrono::Utc;

    fn test_client() -> GeminiClient {
        GeminiClient {
            model: "gemini-1.5-pro".to_string(),
            api_key: "test-key".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            http: Client::new(),
            max_tokens: 1000,
        }
    }

    fn test_request() -> CompletionRequest {
        CompletionRequest {
            message: "add a task to call mom".to_string(),
            context: "You are an assistant for a task management app.".to_string(),
            history: vec![
                HistoryEntry::new("hi", Sender::User, Utc::now()),
                HistoryEntry::new("Hello! How can I help?", Sender::Bot, Utc::now()),
            ],
        }
    }

    #[test]
    fn test_build_request_body_shape() {
        let client = test_client();
        let body = client.build_request_body(&test_request());

        let contents = body["contents"].as_array().unwrap();
        // primer pair + 2 history turns + current message
        assert_eq!(contents.len(), 5);
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[2]["role"], "user");
        assert_eq!(contents[3]["role"], "model");
        // current message is last
        assert_eq!(contents[4]["role"], "user");
        assert_eq!(contents[4]["parts"][0]["text"], "add a task to call mom");

        assert_eq!(body["generationConfig"]["temperature"], 0.7);
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 1000);
    }

    #[test]
    fn test_build_request_body_empty_context_skips_primer() {
        let client = test_client();
        let request = CompletionRequest {
            context: String::new(),
            history: vec![],
            ..test_request()
        };
        let contents_len = client.build_request_body(&request)["contents"].as_array().unwrap().len();
        assert_eq!(contents_len, 1);
    }

    #[test]
    fn test_parse_response_extracts_first_candidate_text() {
        let client = test_client();
        let api_response: GeminiResponse = serde_json::from_str(
            r#"{
                "candidates": [
                    { "content": { "parts": [{ "text": "Sure, adding that task." }] } }
                ]
            }"#,
        )
        .unwrap();

        let response = client.parse_response(api_response).unwrap();
        assert_eq!(response.text, "Sure, adding that task.");
        assert!(response.task_suggestions.is_none());
    }

    #[test]
    fn test_parse_response_without_candidates_fails() {
        let client = test_client();
        let api_response: GeminiResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert!(matches!(
            client.parse_response(api_response),
            Err(LlmError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_retryable_status_classification() {
        assert!(is_retryable_status(429));
        assert!(is_retryable_status(503));
        assert!(is_retryable_status(408));
        assert!(!is_retryable_status(400));
        assert!(!is_retryable_status(401));
        assert!(!is_retryable_status(404));
    }
}
