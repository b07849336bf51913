//! The task analysis record and its schema validation.
//!
//! The generation service replies with semi-structured JSON. That reply
//! is first deserialized into [`RawAnalysis`] (every field optional, no
//! invented defaults), then promoted into a [`TaskAnalysis`] by
//! [`RawAnalysis::validate`]. A `TaskAnalysis` is only ever constructed
//! through validation, so holding one means the invariants hold.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::profile::AnalysisProfile;

/// Format required for `suggestedDateTime` when present
pub const SUGGESTED_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// A validated task prioritization.
///
/// Immutable after creation, owned by the request that produced it.
/// Field names match the JSON wire format on both sides (generation
/// reply and success response).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskAnalysis {
    /// Priority on a 1-5 scale (5 = highest)
    pub priority: u8,

    /// Whether the task falls in the high-leverage top-20% subset
    pub is_pareto_task: bool,

    /// Smallest concrete next action
    pub first_step: String,

    /// Free-form time estimate
    pub time_estimate: String,

    /// One of the profile's category labels
    pub category: String,

    /// Whether a calendar slot should be suggested
    #[serde(default)]
    pub needs_calendar_event: bool,

    /// `YYYY-MM-DD HH:MM`, surfaced only when `needs_calendar_event`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_date_time: Option<String>,

    /// Rationale for the priority
    pub analysis: String,

    /// Ordered steps, at least one
    pub action_plan: Vec<String>,

    /// Which 20% of the task drives 80% of the result (extended profile)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pareto_squared: Option<String>,

    /// Long-term goal vs short-term task framing (extended profile)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub championship_vs_game: Option<String>,
}

/// Unvalidated analysis as deserialized from the generation reply.
///
/// Every field is optional so that absence is a schema violation we can
/// name, not a parse failure. Type mismatches (e.g. a string priority)
/// still fail at deserialization and are classified by the caller.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawAnalysis {
    pub priority: Option<i64>,
    pub is_pareto_task: Option<bool>,
    pub first_step: Option<String>,
    pub time_estimate: Option<String>,
    pub category: Option<String>,
    pub needs_calendar_event: Option<bool>,
    pub suggested_date_time: Option<String>,
    pub analysis: Option<String>,
    pub action_plan: Option<Vec<String>>,
    pub pareto_squared: Option<String>,
    pub championship_vs_game: Option<String>,
}

impl RawAnalysis {
    /// Validate against the schema and promote into a [`TaskAnalysis`].
    ///
    /// Returns a human-readable violation message on failure. Required
    /// fields must be present and non-empty; optional fields get their
    /// defaults (`needsCalendarEvent` → false). Extended-only fields
    /// are dropped under the basic profile.
    pub fn validate(self, profile: &AnalysisProfile) -> Result<TaskAnalysis, String> {
        let priority = self
            .priority
            .ok_or_else(|| "missing required field: priority".to_string())?;
        if !(1..=5).contains(&priority) {
            return Err(format!("priority {} is outside the 1..=5 range", priority));
        }

        let is_pareto_task = self
            .is_pareto_task
            .ok_or_else(|| "missing required field: isParetoTask".to_string())?;

        let first_step = required_text(self.first_step, "firstStep")?;
        let time_estimate = required_text(self.time_estimate, "timeEstimate")?;
        let category = required_text(self.category, "category")?;
        if !profile.categories().contains(&category.as_str()) {
            return Err(format!(
                "category '{}' is not one of {}",
                category,
                profile.categories().join("/")
            ));
        }

        let analysis = required_text(self.analysis, "analysis")?;

        let action_plan = self
            .action_plan
            .ok_or_else(|| "missing required field: actionPlan".to_string())?;
        if action_plan.is_empty() {
            return Err("actionPlan must contain at least one step".to_string());
        }

        let suggested_date_time = match self.suggested_date_time {
            Some(s) if !s.trim().is_empty() => {
                let trimmed = s.trim();
                NaiveDateTime::parse_from_str(trimmed, SUGGESTED_DATETIME_FORMAT).map_err(
                    |_| {
                        format!(
                            "suggestedDateTime '{}' is not in YYYY-MM-DD HH:MM format",
                            trimmed
                        )
                    },
                )?;
                Some(trimmed.to_string())
            }
            _ => None,
        };

        Ok(TaskAnalysis {
            priority: priority as u8,
            is_pareto_task,
            first_step,
            time_estimate,
            category,
            needs_calendar_event: self.needs_calendar_event.unwrap_or(false),
            suggested_date_time,
            analysis,
            action_plan,
            pareto_squared: self
                .pareto_squared
                .filter(|_| profile.has_extended_fields()),
            championship_vs_game: self
                .championship_vs_game
                .filter(|_| profile.has_extended_fields()),
        })
    }
}

fn required_text(value: Option<String>, field: &str) -> Result<String, String> {
    match value {
        Some(s) if !s.trim().is_empty() => Ok(s),
        Some(_) => Err(format!("field {} must be non-empty", field)),
        None => Err(format!("missing required field: {}", field)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_valid() -> RawAnalysis {
        serde_json::from_value(serde_json::json!({
            "priority": 5,
            "isParetoTask": true,
            "firstStep": "Otevřít dokument",
            "timeEstimate": "30 min",
            "category": "práce",
            "analysis": "Klíčový výstup týdne",
            "actionPlan": ["a", "b"],
        }))
        .unwrap()
    }

    #[test]
    fn test_valid_record_promotes() {
        let analysis = raw_valid().validate(&AnalysisProfile::Extended).unwrap();
        assert_eq!(analysis.priority, 5);
        assert!(analysis.is_pareto_task);
        assert_eq!(analysis.action_plan.len(), 2);
        assert!(!analysis.needs_calendar_event);
        assert!(analysis.suggested_date_time.is_none());
    }

    #[test]
    fn test_priority_out_of_range_rejected() {
        for bad in [0, 6, -1, 42] {
            let mut raw = raw_valid();
            raw.priority = Some(bad);
            let err = raw.validate(&AnalysisProfile::Extended).unwrap_err();
            assert!(err.contains("priority"), "unexpected message: {}", err);
        }
    }

    #[test]
    fn test_missing_required_fields_rejected() {
        let mut raw = raw_valid();
        raw.priority = None;
        assert!(raw.validate(&AnalysisProfile::Extended).is_err());

        let mut raw = raw_valid();
        raw.first_step = None;
        assert!(raw.validate(&AnalysisProfile::Extended).is_err());

        let mut raw = raw_valid();
        raw.analysis = None;
        assert!(raw.validate(&AnalysisProfile::Extended).is_err());

        let mut raw = raw_valid();
        raw.action_plan = None;
        assert!(raw.validate(&AnalysisProfile::Extended).is_err());
    }

    #[test]
    fn test_empty_action_plan_rejected() {
        let mut raw = raw_valid();
        raw.action_plan = Some(vec![]);
        let err = raw.validate(&AnalysisProfile::Extended).unwrap_err();
        assert!(err.contains("actionPlan"));
    }

    #[test]
    fn test_blank_first_step_rejected() {
        let mut raw = raw_valid();
        raw.first_step = Some("   ".to_string());
        assert!(raw.validate(&AnalysisProfile::Extended).is_err());
    }

    #[test]
    fn test_category_must_match_profile_set() {
        let mut raw = raw_valid();
        raw.category = Some("učení".to_string());
        // Extended knows the learning category, basic does not
        assert!(raw.clone().validate(&AnalysisProfile::Extended).is_ok());
        assert!(raw.validate(&AnalysisProfile::Basic).is_err());

        let mut raw = raw_valid();
        raw.category = Some("hobby".to_string());
        assert!(raw.validate(&AnalysisProfile::Extended).is_err());
    }

    #[test]
    fn test_suggested_datetime_format_enforced() {
        let mut raw = raw_valid();
        raw.suggested_date_time = Some("2026-08-07 14:30".to_string());
        let analysis = raw.validate(&AnalysisProfile::Extended).unwrap();
        assert_eq!(analysis.suggested_date_time.as_deref(), Some("2026-08-07 14:30"));

        let mut raw = raw_valid();
        raw.suggested_date_time = Some("zítra odpoledne".to_string());
        assert!(raw.validate(&AnalysisProfile::Extended).is_err());
    }

    #[test]
    fn test_extended_fields_dropped_under_basic_profile() {
        let mut raw = raw_valid();
        raw.pareto_squared = Some("první krok".to_string());
        raw.championship_vs_game = Some("hra".to_string());

        let extended = raw.clone().validate(&AnalysisProfile::Extended).unwrap();
        assert!(extended.pareto_squared.is_some());
        assert!(extended.championship_vs_game.is_some());

        let basic = raw.validate(&AnalysisProfile::Basic).unwrap();
        assert!(basic.pareto_squared.is_none());
        assert!(basic.championship_vs_game.is_none());
    }

    #[test]
    fn test_optional_serialization_skips_absent_fields() {
        let analysis = raw_valid().validate(&AnalysisProfile::Extended).unwrap();
        let json = serde_json::to_value(&analysis).unwrap();
        assert!(json.get("suggestedDateTime").is_none());
        assert!(json.get("paretoSquared").is_none());
        assert_eq!(json["needsCalendarEvent"], false);
    }
}
