//! Request orchestration: normalize → analyze → format → dispatch.
//!
//! The orchestrator owns the collaborator handles for the lifetime of
//! the process and sequences the stages for each request. Any stage
//! failure short-circuits the rest and is surfaced as a
//! [`PipelineError`]; a dispatch failure after a successful analysis is
//! still an overall failure (no partial results). Dispatch is skipped
//! entirely, without error, when the request names no destination.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::adapters::{
    DispatchError, Dispatcher, Generator, Transcriber, TranscriptionError,
};
use crate::domain::{AnalysisProfile, CanonicalInput, TaskAnalysis, TaskRequest};

use super::analyzer::{AnalysisEngine, AnalysisError};
use super::formatter;
use super::normalizer::{InputError, InputNormalizer, NormalizeError};

/// A stage-tagged pipeline failure
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Input normalization failed: {0}")]
    Input(#[from] InputError),

    #[error("Transcription failed: {0}")]
    Transcription(#[from] TranscriptionError),

    #[error("Task analysis failed: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("Notification dispatch failed: {0}")]
    Dispatch(#[from] DispatchError),
}

impl From<NormalizeError> for PipelineError {
    fn from(err: NormalizeError) -> Self {
        match err {
            NormalizeError::Input(e) => Self::Input(e),
            NormalizeError::Transcription(e) => Self::Transcription(e),
        }
    }
}

impl PipelineError {
    /// HTTP status this failure maps to
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Input(_) => 400,
            Self::Transcription(_) | Self::Analysis(_) | Self::Dispatch(_) => 500,
        }
    }
}

/// Result of a successfully handled request
#[derive(Debug)]
pub struct PipelineOutcome {
    /// Request id assigned for tracing
    pub request_id: Uuid,

    /// The canonical input the analysis was based on
    pub input: CanonicalInput,

    /// The validated analysis
    pub analysis: TaskAnalysis,

    /// Whether a notification was dispatched
    pub dispatched: bool,
}

/// Sequences the pipeline stages for one request at a time
pub struct RequestOrchestrator {
    normalizer: InputNormalizer,
    engine: AnalysisEngine,
    dispatcher: Arc<dyn Dispatcher>,
    profile: AnalysisProfile,
}

impl RequestOrchestrator {
    /// Wire up the pipeline around collaborator handles created at
    /// process start
    pub fn new(
        transcriber: Arc<dyn Transcriber>,
        generator: Arc<dyn Generator>,
        dispatcher: Arc<dyn Dispatcher>,
        profile: AnalysisProfile,
        temperature: f32,
    ) -> Self {
        Self {
            normalizer: InputNormalizer::new(transcriber),
            engine: AnalysisEngine::new(generator, profile, temperature),
            dispatcher,
            profile,
        }
    }

    /// Profile this orchestrator serves
    pub fn profile(&self) -> AnalysisProfile {
        self.profile
    }

    /// Handle one request end to end
    #[instrument(skip(self, request))]
    pub async fn handle(&self, request: &TaskRequest) -> Result<PipelineOutcome, PipelineError> {
        let request_id = Uuid::new_v4();
        info!(
            %request_id,
            has_audio = request.audio_base64.is_some(),
            has_text = request.text.is_some(),
            has_email = request.user_email.is_some(),
            "Handling task request"
        );

        let input = self.normalizer.normalize(request, &self.profile).await?;
        debug!(%request_id, provenance = ?input.provenance, "Input normalized");

        let analysis = self.engine.analyze(&input.text).await?;
        info!(
            %request_id,
            priority = analysis.priority,
            category = %analysis.category,
            "Analysis completed"
        );

        let destination = request
            .user_email
            .as_deref()
            .filter(|address| !address.trim().is_empty());

        let dispatched = match destination {
            Some(address) => {
                let notification = formatter::render(&analysis, &input.text);
                self.dispatcher
                    .dispatch(address, &notification.subject, &notification.body)
                    .await?;
                info!(%request_id, "Notification dispatched");
                true
            }
            None => {
                debug!(%request_id, "No destination address, dispatch skipped");
                false
            }
        };

        Ok(PipelineOutcome {
            request_id,
            input,
            analysis,
            dispatched,
        })
    }
}
