//! Pipeline capability profiles.
//!
//! The service historically shipped as two near-duplicate endpoints: a
//! text-only one and an audio-capable one with two extra heuristic
//! fields and one extra category. Both survive as a single pipeline
//! parameterized by this profile; which one is served is configuration.

use serde::{Deserialize, Serialize};

/// Which request/schema variant the pipeline serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisProfile {
    /// Text-only intake, four categories, no extended heuristics
    Basic,

    /// Audio + text intake, five categories, plus the Pareto² and
    /// championship-vs-game fields
    Extended,
}

impl Default for AnalysisProfile {
    fn default() -> Self {
        Self::Extended
    }
}

impl AnalysisProfile {
    /// Whether audio payloads are consumed (the basic variant ignores
    /// them entirely)
    pub fn accepts_audio(&self) -> bool {
        matches!(self, Self::Extended)
    }

    /// Whether the prompt requests and the schema admits the extended
    /// heuristic fields
    pub fn has_extended_fields(&self) -> bool {
        matches!(self, Self::Extended)
    }

    /// Category labels the generation service is instructed to choose from
    pub fn categories(&self) -> &'static [&'static str] {
        match self {
            Self::Basic => &["práce", "osobní", "zdraví", "finance"],
            Self::Extended => &["práce", "osobní", "zdraví", "finance", "učení"],
        }
    }
}
