//! Collaborator interfaces for external services.
//!
//! Adapters provide a unified interface for the three external
//! collaborators: speech-to-text, text generation, and mail dispatch.
//! Each is a trait so the pipeline can be exercised with test doubles;
//! the real implementations are thin HTTP clients. Client handles are
//! constructed once at process start and shared read-only; they carry
//! no per-request state.

pub mod mailer;
pub mod openai;

use async_trait::async_trait;
use thiserror::Error;

// Re-export the HTTP implementations
pub use mailer::{MailClient, MailerConfig};
pub use openai::{OpenAiClient, OpenAiConfig};

/// Errors from the speech-to-text collaborator
#[derive(Debug, Clone, Error)]
pub enum TranscriptionError {
    #[error("Audio payload could not be decoded: {0}")]
    Decode(String),

    #[error("Transcription request failed: {0}")]
    Upstream(String),

    #[error("Transcription request timed out after {0}s")]
    Timeout(u64),
}

/// Errors from the text-generation collaborator
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    #[error("Generation request failed: {0}")]
    Upstream(String),

    #[error("Generation request timed out after {0}s")]
    Timeout(u64),

    #[error("Generation service returned an empty reply")]
    Empty,
}

/// Errors from the mail-dispatch collaborator
#[derive(Debug, Clone, Error)]
pub enum DispatchError {
    #[error("Mail request timed out after {0}s")]
    Timeout(u64),

    #[error("Mail transport failed: {0}")]
    Transport(String),

    #[error("Mail API rejected the message: {0}")]
    Rejected(String),
}

/// Converts recorded audio into text
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe raw audio bytes, hinting the spoken language
    async fn transcribe(&self, audio: &[u8], language: &str)
        -> Result<String, TranscriptionError>;
}

/// Produces free-form text from a single prompt
#[async_trait]
pub trait Generator: Send + Sync {
    /// Run a single-turn completion at the given sampling temperature
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String, GenerationError>;
}

/// Delivers a rendered notification to a destination address
#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn dispatch(&self, to: &str, subject: &str, body: &str) -> Result<(), DispatchError>;
}
