//! Notification rendering: analysis → subject + body.
//!
//! Pure string assembly, deterministic for identical input. Section
//! order is part of the contract: marker header, original text,
//! priority, first step, time estimate, category, extended heuristics
//! (present fields only), numbered action plan, rationale, suggested
//! time (only when a calendar event is wanted), tips footer.

use crate::domain::TaskAnalysis;

/// A rendered notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub body: String,
}

/// Symbolic marker for a priority tier
pub fn priority_marker(priority: u8) -> &'static str {
    if priority >= 4 {
        "🔥"
    } else if priority >= 3 {
        "⚡"
    } else {
        "📝"
    }
}

/// Render the notification for an analysis and the text it came from
pub fn render(analysis: &TaskAnalysis, original_text: &str) -> Notification {
    let marker = priority_marker(analysis.priority);
    let pareto_marker = if analysis.is_pareto_task {
        " ⭐ PARETO ÚKOL!"
    } else {
        ""
    };

    let subject = format!(
        "{} Úkol analyzován: Priorita {}/5{}",
        marker, analysis.priority, pareto_marker
    );

    let mut body = String::new();

    body.push_str(&format!("{} ANALÝZA ÚKOLU{}\n\n", marker, pareto_marker));
    body.push_str(&format!("📋 Původní text: \"{}\"\n\n", original_text));

    body.push_str(&format!("🎯 Priorita: {}/5\n", analysis.priority));
    if analysis.is_pareto_task {
        body.push_str("⭐ JE TO PARETO ÚKOL (top 20%)!\n");
    }
    body.push('\n');

    body.push_str(&format!(
        "✅ PRVNÍ KROK (začni hned):\n{}\n\n",
        analysis.first_step
    ));
    body.push_str(&format!("⏱️ Odhad času: {}\n", analysis.time_estimate));
    body.push_str(&format!("📂 Kategorie: {}\n\n", analysis.category));

    if let Some(pareto_squared) = &analysis.pareto_squared {
        body.push_str(&format!("🧠 PARETO² ANALÝZA:\n{}\n\n", pareto_squared));
    }
    if let Some(championship) = &analysis.championship_vs_game {
        body.push_str(&format!("🏆 CHAMPIONSHIP VS GAME:\n{}\n\n", championship));
    }

    body.push_str("📝 AKČNÍ PLÁN:\n");
    for (index, step) in analysis.action_plan.iter().enumerate() {
        body.push_str(&format!("{}. {}\n", index + 1, step));
    }
    body.push('\n');

    body.push_str(&format!("📊 Zdůvodnění priority:\n{}\n", analysis.analysis));

    if analysis.needs_calendar_event {
        if let Some(suggested) = &analysis.suggested_date_time {
            body.push_str(&format!("\n📅 Navrhovaný čas: {}\n", suggested));
        }
    }

    body.push_str(
        "\n---\n🚀 Produktivní tipy:\n\
         • Začni prvním krokem během 2 minut (Zeigarnik efekt)\n\
         • Zaměř se na Pareto úkoly (80% výsledku z 20% času)\n\
         • Pamatuj na dlouhodobé cíle vs. krátkodobé \"hry\"\n",
    );

    Notification { subject, body }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AnalysisProfile, RawAnalysis};

    fn analysis(priority: u8) -> TaskAnalysis {
        let raw: RawAnalysis = serde_json::from_value(serde_json::json!({
            "priority": priority,
            "isParetoTask": true,
            "firstStep": "Otevřít dokument",
            "timeEstimate": "30 min",
            "category": "práce",
            "analysis": "Klíčový výstup týdne",
            "actionPlan": ["Osnova", "Návrh", "Revize"],
        }))
        .unwrap();
        raw.validate(&AnalysisProfile::Extended).unwrap()
    }

    #[test]
    fn test_marker_tiers() {
        assert_eq!(priority_marker(5), "🔥");
        assert_eq!(priority_marker(4), "🔥");
        assert_eq!(priority_marker(3), "⚡");
        assert_eq!(priority_marker(2), "📝");
        assert_eq!(priority_marker(1), "📝");
    }

    #[test]
    fn test_body_contains_priority_and_plan_in_order() {
        let rendered = render(&analysis(5), "napsat report");

        assert!(rendered.body.contains("Priorita: 5/5"));
        assert!(rendered.body.contains("\"napsat report\""));

        let first = rendered.body.find("1. Osnova").unwrap();
        let second = rendered.body.find("2. Návrh").unwrap();
        let third = rendered.body.find("3. Revize").unwrap();
        assert!(first < second && second < third);
    }

    #[test]
    fn test_subject_line() {
        let rendered = render(&analysis(5), "x");
        assert_eq!(
            rendered.subject,
            "🔥 Úkol analyzován: Priorita 5/5 ⭐ PARETO ÚKOL!"
        );
    }

    #[test]
    fn test_no_pareto_marker_for_ordinary_task() {
        let mut task = analysis(2);
        task.is_pareto_task = false;
        let rendered = render(&task, "x");

        assert!(!rendered.subject.contains("PARETO"));
        assert!(!rendered.body.contains("JE TO PARETO ÚKOL"));
        assert!(rendered.subject.starts_with("📝"));
    }

    #[test]
    fn test_calendar_line_only_when_wanted() {
        let mut task = analysis(4);
        task.suggested_date_time = Some("2026-08-10 09:00".to_string());

        // needs_calendar_event is false: the line is suppressed
        let rendered = render(&task, "x");
        assert!(!rendered.body.contains("Navrhovaný čas"));

        task.needs_calendar_event = true;
        let rendered = render(&task, "x");
        assert!(rendered.body.contains("📅 Navrhovaný čas: 2026-08-10 09:00"));
    }

    #[test]
    fn test_extended_sections_only_when_present() {
        let mut task = analysis(4);
        let rendered = render(&task, "x");
        assert!(!rendered.body.contains("PARETO² ANALÝZA"));

        task.pareto_squared = Some("Napsat shrnutí".to_string());
        task.championship_vs_game = Some("Krátkodobá hra".to_string());
        let rendered = render(&task, "x");

        let pareto = rendered.body.find("🧠 PARETO² ANALÝZA:\nNapsat shrnutí").unwrap();
        let championship = rendered
            .body
            .find("🏆 CHAMPIONSHIP VS GAME:\nKrátkodobá hra")
            .unwrap();
        let plan = rendered.body.find("📝 AKČNÍ PLÁN:").unwrap();
        let rationale = rendered.body.find("📊 Zdůvodnění priority:").unwrap();
        assert!(pareto < championship && championship < plan && plan < rationale);
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let task = analysis(3);
        assert_eq!(render(&task, "stejný text"), render(&task, "stejný text"));
    }
}
