//! OpenAI chat-completions corrector adapter

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::application::ports::Corrector;
use crate::domain::config::{DEFAULT_API_BASE_URL, DEFAULT_MODEL};
use crate::domain::correction::{
    classify, CorrectionFailure, CorrectionPrompt, CorrectionRequest, ErrorKind,
};

/// Low temperature keeps the output close to the input
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

// Request types for the chat completions API

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

// Response types for the chat completions API

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ApiError,
}

/// Corrector backed by an OpenAI-compatible `/chat/completions` endpoint
pub struct OpenAiCorrector {
    base_url: String,
    model: String,
    prompt: CorrectionPrompt,
    client: reqwest::Client,
}

impl OpenAiCorrector {
    pub fn new(prompt: CorrectionPrompt) -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            prompt,
            client: reqwest::Client::new(),
        }
    }

    /// Point at another OpenAI-compatible server
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Transport-level deadline for one HTTP exchange
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, reqwest::Error> {
        self.client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    fn api_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn build_request<'a>(&'a self, request: &'a CorrectionRequest) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            temperature: DEFAULT_TEMPERATURE,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: self.prompt.content(),
                },
                ChatMessage {
                    role: "user",
                    content: request.text(),
                },
            ],
        }
    }

    fn extract_text(response: ChatResponse) -> Result<String, CorrectionFailure> {
        if let Some(error) = response.error {
            return Err(CorrectionFailure::classified(error.message));
        }

        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .unwrap_or_default();

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(CorrectionFailure::new(
                ErrorKind::EmptyResponse,
                "response contained no text",
            ));
        }

        Ok(trimmed.to_string())
    }
}

/// Map a transport error into a failure kind
fn transport_failure(err: reqwest::Error) -> CorrectionFailure {
    if err.is_timeout() {
        CorrectionFailure::timeout(err.to_string())
    } else if err.is_connect() || err.is_request() {
        CorrectionFailure::new(ErrorKind::ConnectionFailure, err.to_string())
    } else {
        CorrectionFailure::classified(err.to_string())
    }
}

/// Map a non-success HTTP reply into a failure kind
fn http_failure(status: reqwest::StatusCode, body: &str) -> CorrectionFailure {
    let detail = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.trim().to_string());
    CorrectionFailure::classified(format!("HTTP {}: {}", status, detail))
}

#[async_trait]
impl Corrector for OpenAiCorrector {
    async fn attempt(
        &self,
        request: &CorrectionRequest,
        credential: &str,
    ) -> Result<String, CorrectionFailure> {
        let response = self
            .client
            .post(self.api_url())
            .bearer_auth(credential)
            .json(&self.build_request(request))
            .send()
            .await
            .map_err(transport_failure)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(http_failure(status, &body));
        }

        let response: ChatResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                CorrectionFailure::timeout(e.to_string())
            } else {
                CorrectionFailure::new(
                    ErrorKind::Unknown,
                    format!("Failed to parse API response: {}", e),
                )
            }
        })?;

        Self::extract_text(response)
    }
}
