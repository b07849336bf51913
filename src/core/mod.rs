//! The analysis pipeline.
//!
//! Stages, in request order:
//!
//! ```text
//! TaskRequest → normalizer → CanonicalInput
//!             → analyzer   → TaskAnalysis
//!             → formatter  → Notification
//!             → dispatcher (skipped when no address)
//! ```
//!
//! The orchestrator sequences the stages and maps each stage failure
//! into a [`PipelineError`]; stages are strictly sequential per request
//! and nothing is retried.

pub mod analyzer;
pub mod formatter;
pub mod normalizer;
pub mod orchestrator;

pub use analyzer::{AnalysisEngine, AnalysisError};
pub use formatter::{render, Notification};
pub use normalizer::{InputError, InputNormalizer, NormalizeError};
pub use orchestrator::{PipelineError, PipelineOutcome, RequestOrchestrator};
