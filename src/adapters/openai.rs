//! OpenAI-compatible client for transcription and generation.
//!
//! One struct, one `reqwest::Client` with an explicit timeout, two
//! trait implementations: `/v1/audio/transcriptions` (multipart) for
//! speech-to-text and `/v1/chat/completions` for generation. Any
//! OpenAI-compatible endpoint works; the base URL is configuration.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{GenerationError, Generator, Transcriber, TranscriptionError};

/// Configuration for the OpenAI-compatible client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    /// Base URL of the API (no trailing slash)
    pub endpoint: String,
    /// Chat model used for analysis
    pub model: String,
    /// Speech-to-text model
    pub transcription_model: String,
    /// Bearer token; optional for local OpenAI-compatible servers
    pub api_key: Option<String>,
    /// Timeout applied to every request
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com".to_string(),
            model: "gpt-4".to_string(),
            transcription_model: "whisper-1".to_string(),
            api_key: None,
            timeout_secs: 60,
        }
    }
}

/// HTTP client for an OpenAI-compatible API
pub struct OpenAiClient {
    config: OpenAiConfig,
    client: reqwest::Client,
}

/// Chat completion response (the fields we read)
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// Transcription response
#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

impl OpenAiClient {
    /// Create a new client; the underlying HTTP client is built once
    /// and reused across requests
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    /// Build API URL for a path like `/v1/chat/completions`
    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.config.endpoint.trim_end_matches('/'), path)
    }

    fn bearer(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }
}

#[async_trait]
impl Generator for OpenAiClient {
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String, GenerationError> {
        let url = self.api_url("/v1/chat/completions");

        let body = serde_json::json!({
            "model": self.config.model,
            "messages": [{ "role": "user", "content": prompt }],
            "temperature": temperature,
        });

        let response = self
            .bearer(self.client.post(&url).json(&body))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout(self.config.timeout_secs)
                } else {
                    GenerationError::Upstream(format!("request failed: {}", e))
                }
            })?;

        if !response.status().is_success() {
            return Err(GenerationError::Upstream(format!(
                "HTTP {} from generation API",
                response.status()
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Upstream(format!("unreadable response: {}", e)))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or(GenerationError::Empty)
    }
}

#[async_trait]
impl Transcriber for OpenAiClient {
    async fn transcribe(
        &self,
        audio: &[u8],
        language: &str,
    ) -> Result<String, TranscriptionError> {
        let url = self.api_url("/v1/audio/transcriptions");

        let file_part = Part::bytes(audio.to_vec())
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .map_err(|e| TranscriptionError::Upstream(format!("invalid audio part: {}", e)))?;

        let form = Form::new()
            .text("model", self.config.transcription_model.clone())
            .text("language", language.to_string())
            .part("file", file_part);

        let response = self
            .bearer(self.client.post(&url).multipart(form))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TranscriptionError::Timeout(self.config.timeout_secs)
                } else {
                    TranscriptionError::Upstream(format!("request failed: {}", e))
                }
            })?;

        if !response.status().is_success() {
            return Err(TranscriptionError::Upstream(format!(
                "HTTP {} from transcription API",
                response.status()
            )));
        }

        let transcription: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| TranscriptionError::Upstream(format!("unreadable response: {}", e)))?;

        Ok(transcription.text.trim().to_string())
    }
}
