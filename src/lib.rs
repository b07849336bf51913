//! tasktriage - Voice-to-task triage service
//!
//! Accepts a task description (spoken or typed) and produces a
//! structured prioritization using a fixed set of productivity
//! heuristics, then notifies the user by e-mail.
//!
//! # Architecture
//!
//! The core is a single request-scoped pipeline:
//!
//! ```text
//! audio/text → normalizer → canonical text
//!            → analyzer   → TaskAnalysis (prompt → generate → parse/validate)
//!            → formatter  → notification
//!            → dispatcher → e-mail (skipped when no address)
//! ```
//!
//! External collaborators (speech-to-text, text generation, mail
//! transport) sit behind traits in `adapters`; their HTTP clients are
//! created once at process start and shared read-only.
//!
//! # Modules
//!
//! - `adapters`: External service integrations (OpenAI-compatible API, mail API)
//! - `core`: Pipeline stages (normalizer, analyzer, formatter, orchestrator)
//! - `domain`: Data structures (TaskRequest, CanonicalInput, TaskAnalysis)
//! - `server`: HTTP boundary (single route, CORS, status mapping)
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Serve the HTTP endpoint
//! tasktriage serve
//!
//! # Analyze a task from the terminal
//! tasktriage analyze "napsat report pro klienta"
//!
//! # Transcribe and analyze a recording, mailing the result
//! tasktriage analyze --audio memo.wav --email me@example.cz
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;

// Re-export main types at crate root for convenience
pub use crate::core::{
    AnalysisEngine, AnalysisError, InputError, InputNormalizer, Notification, PipelineError,
    PipelineOutcome, RequestOrchestrator,
};
pub use crate::domain::{AnalysisProfile, CanonicalInput, Provenance, TaskAnalysis, TaskRequest};

// Collaborator seams
pub use crate::adapters::{Dispatcher, Generator, Transcriber};
