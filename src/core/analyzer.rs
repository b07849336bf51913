//! Task analysis: prompt construction, generation call, reply parsing.
//!
//! The prompt embeds the canonical text verbatim inside a fixed Czech
//! instruction block that names the required JSON fields (per profile)
//! and the prioritization rubric. The reply is expected to be JSON,
//! possibly wrapped in a code fence; fence stripping is a pure string
//! transform so it can be tested on its own. A single generation
//! attempt is made; nothing here retries.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::adapters::{GenerationError, Generator};
use crate::domain::{AnalysisProfile, RawAnalysis, TaskAnalysis};

/// Failures while producing a validated analysis
#[derive(Debug, Clone, Error)]
pub enum AnalysisError {
    #[error("Generation call failed: {0}")]
    UpstreamFailure(#[from] GenerationError),

    #[error("Generation reply is not valid JSON: {0}")]
    MalformedResponse(String),

    #[error("Generation reply does not match the analysis schema: {0}")]
    SchemaViolation(String),
}

/// Builds prompts, invokes the generation collaborator, and validates
/// the reply into a [`TaskAnalysis`]
pub struct AnalysisEngine {
    generator: Arc<dyn Generator>,
    profile: AnalysisProfile,
    temperature: f32,
}

impl AnalysisEngine {
    pub fn new(generator: Arc<dyn Generator>, profile: AnalysisProfile, temperature: f32) -> Self {
        Self {
            generator,
            profile,
            temperature,
        }
    }

    /// Analyze canonical text into a validated record
    pub async fn analyze(&self, text: &str) -> Result<TaskAnalysis, AnalysisError> {
        let prompt = build_prompt(text, &self.profile);
        let reply = self.generator.generate(&prompt, self.temperature).await?;
        debug!(reply_len = reply.len(), "Generation reply received");
        parse_analysis(&reply, &self.profile)
    }
}

/// Build the analysis prompt for a task.
///
/// The instruction block is fixed; only the task text and the
/// profile-dependent field set vary. The closing line demands JSON-only
/// output with no surrounding prose.
pub fn build_prompt(task: &str, profile: &AnalysisProfile) -> String {
    let categories = profile.categories().join("/");

    let extended_fields = if profile.has_extended_fields() {
        ",\n  \"paretoSquared\": \"Co je 20% z tohoto úkolu, co přinese 80% výsledku?\",\n  \
         \"championshipVsGame\": \"Je to dlouhodobý cíl (šampionát) nebo krátkodobý úkol (hra)?\""
    } else {
        ""
    };

    let extended_focus = if profile.has_extended_fields() {
        "\n- Championship mentality: Je lepší \"prohrát hru aby vyhrál šampionát\"?\
         \n- Rozděl na menší části podle Pareto²"
    } else {
        ""
    };

    format!(
        r#"Uživatel nadiktoval úkol: "{task}"

Aplikuj produktivní principy (Pareto princip, Zeigarnik efekt, Championship mentality) a odpověz v JSON formátu:

{{
  "priority": 1-5 (5 = nejvyšší),
  "isParetoTask": true/false (je to v top 20% důležitých věcí?),
  "firstStep": "Konkrétní malý první krok (Zeigarnik efekt)",
  "timeEstimate": "Odhad času",
  "category": "{categories}",
  "needsCalendarEvent": true/false,
  "suggestedDateTime": "YYYY-MM-DD HH:MM" nebo null,
  "analysis": "Krátké zdůvodnění priority podle Pareto principu",
  "actionPlan": ["krok 1", "krok 2", "krok 3"]{extended_fields}
}}

Zaměř se na:
- Pareto princip: Je to ve 20% nejdůležitějších aktivit?
- Zeigarnik efekt: Jaký je nejmenší možný první krok?{extended_focus}

Odpověz pouze JSON, bez dalšího textu.
"#
    )
}

/// Strip a surrounding code fence from a generation reply.
///
/// Tolerates a leading fence with or without a language tag, a trailing
/// fence, and whitespace around either. Unfenced input passes through
/// unchanged (modulo outer whitespace).
pub fn strip_code_fences(raw: &str) -> &str {
    let mut s = raw.trim();

    if let Some(rest) = s.strip_prefix("```") {
        s = match rest.find('\n') {
            Some(idx) => &rest[idx + 1..],
            // Single-line fence: drop the language tag, keep the payload
            None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
        };
    }

    if let Some(rest) = s.trim_end().strip_suffix("```") {
        s = rest;
    }

    s.trim()
}

/// Parse and validate a generation reply into a [`TaskAnalysis`].
///
/// Classification: not JSON at all → `MalformedResponse`; JSON with
/// wrong types, missing required fields, or invariant violations →
/// `SchemaViolation`.
pub fn parse_analysis(
    reply: &str,
    profile: &AnalysisProfile,
) -> Result<TaskAnalysis, AnalysisError> {
    let stripped = strip_code_fences(reply);

    let value: serde_json::Value = serde_json::from_str(stripped)
        .map_err(|e| AnalysisError::MalformedResponse(e.to_string()))?;

    let raw: RawAnalysis = serde_json::from_value(value)
        .map_err(|e| AnalysisError::SchemaViolation(e.to_string()))?;

    raw.validate(profile).map_err(AnalysisError::SchemaViolation)
}
