//! Input normalization: request payload → canonical text.
//!
//! Audio takes precedence over text when both are supplied. An empty
//! audio or text field counts as absent; absence of both is the only
//! 400-class failure the pipeline produces. Profiles that do not accept
//! audio ignore the audio field entirely rather than rejecting it, so a
//! text fallback still works.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use thiserror::Error;

use crate::adapters::{Transcriber, TranscriptionError};
use crate::domain::{AnalysisProfile, CanonicalInput, TaskRequest};

/// Fixed language hint passed to the transcription collaborator
pub const TRANSCRIPTION_LANGUAGE: &str = "cs";

/// Request-payload errors
#[derive(Debug, Clone, Error)]
pub enum InputError {
    #[error("Neither audio nor text was supplied")]
    Missing,
}

/// Failures while producing canonical text
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Transcription(#[from] TranscriptionError),
}

/// Turns a raw request into canonical text, delegating audio to the
/// transcription collaborator
pub struct InputNormalizer {
    transcriber: Arc<dyn Transcriber>,
}

impl InputNormalizer {
    pub fn new(transcriber: Arc<dyn Transcriber>) -> Self {
        Self { transcriber }
    }

    /// Produce the canonical input for a request.
    ///
    /// Audio path: base64 → bytes → transcription with the fixed
    /// language hint. Text path: verbatim. Neither → `InputError::Missing`.
    pub async fn normalize(
        &self,
        request: &TaskRequest,
        profile: &AnalysisProfile,
    ) -> Result<CanonicalInput, NormalizeError> {
        let audio = request
            .audio_base64
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .filter(|_| profile.accepts_audio());

        if let Some(encoded) = audio {
            let bytes = BASE64
                .decode(encoded.trim())
                .map_err(|e| TranscriptionError::Decode(e.to_string()))?;
            if bytes.is_empty() {
                return Err(TranscriptionError::Decode("decoded audio is empty".to_string()).into());
            }

            let text = self
                .transcriber
                .transcribe(&bytes, TRANSCRIPTION_LANGUAGE)
                .await?;
            return Ok(CanonicalInput::spoken(text));
        }

        match request.text.as_deref().filter(|s| !s.is_empty()) {
            Some(text) => Ok(CanonicalInput::typed(text)),
            None => Err(InputError::Missing.into()),
        }
    }
}
