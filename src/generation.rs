//! Client for the external generative-text service (Gemini `generateContent`).
//!
//! The client returns a typed [`GenerationError`]; how a failure is presented over
//! HTTP is decided by [`GenerationClient::respond`], driven by configuration.

use crate::config::GenerationConfig;
use crate::error::AppError;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use std::fmt;
use std::time::Duration;

/// Prefix of every failure message produced by the generation routes.
pub const ERROR_PREFIX: &str = "Error generating content: ";

/// Prompt for `POST /generate`.
pub fn topic_prompt(topic: &str) -> String {
    format!(
        "Write a short professional introduction for a document about: {}",
        topic
    )
}

/// Prompt for `POST /refine`.
pub fn refine_prompt(content: &str, instruction: &str) -> String {
    format!(
        "Refine the following document content according to this instruction: {}\n\nContent:\n{}",
        instruction, content
    )
}

#[derive(Debug)]
pub enum GenerationError {
    /// The request never produced a response (connect, TLS, timeout, body decode).
    Transport(reqwest::Error),
    /// The service answered with a non-success status.
    Status { status: StatusCode, body: String },
    /// The service answered 200 but without any text.
    EmptyResponse,
}

impl GenerationError {
    /// The text shown to API callers, e.g. `Error generating content: 429 ...`.
    pub fn user_message(&self) -> String {
        format!("{}{}", ERROR_PREFIX, self)
    }
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GenerationError::Transport(e) => write!(f, "request failed: {}", e),
            GenerationError::Status { status, body } => write!(f, "{} {}", status, body),
            GenerationError::EmptyResponse => write!(f, "the model returned no text"),
        }
    }
}

impl std::error::Error for GenerationError {}

impl From<reqwest::Error> for GenerationError {
    fn from(error: reqwest::Error) -> Self {
        GenerationError::Transport(error)
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Shared, immutable handle to the generation service.
pub struct GenerationClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    errors_as_text: bool,
}

impl GenerationClient {
    pub fn new(config: &GenerationConfig) -> Result<Self, GenerationError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            http: builder.build()?,
            endpoint: format!(
                "{}/v1beta/models/{}:generateContent",
                config.base_url.trim_end_matches('/'),
                config.model
            ),
            api_key: config.api_key.clone(),
            errors_as_text: config.errors_as_text,
        })
    }

    /// Sends `prompt` to the model and returns its text verbatim.
    pub async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let payload = json!({
            "contents": [{
                "parts": [{ "text": prompt }]
            }]
        });

        let resp = self
            .http
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GenerationError::Status { status, body });
        }

        let body: GenerateContentResponse = resp.json().await?;
        body.into_text().ok_or(GenerationError::EmptyResponse)
    }

    /// Runs `prompt` and applies the configured failure policy.
    ///
    /// With `errors_as_text` the error message becomes the content; otherwise it
    /// surfaces as `AppError::UpstreamError` (HTTP 502).
    pub async fn respond(&self, prompt: &str) -> Result<String, AppError> {
        match self.generate(prompt).await {
            Ok(text) => Ok(text),
            Err(err) => {
                log::warn!("generation failed: {}", err);
                if self.errors_as_text {
                    Ok(err.user_message())
                } else {
                    Err(err.into())
                }
            }
        }
    }
}
