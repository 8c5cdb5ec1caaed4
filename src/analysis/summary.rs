use serde_json::{Map, Value};

use crate::ingest::CommunicationType;
use crate::models::TeamMetadata;

fn section<'a>(dashboard: &'a Map<String, Value>, key: &str) -> Option<&'a Map<String, Value>> {
    dashboard.get(key).and_then(Value::as_object)
}

fn score(section: Option<&Map<String, Value>>, key: &str) -> f64 {
    section
        .and_then(|s| s.get(key))
        .and_then(Value::as_f64)
        .unwrap_or(0.0)
}

fn bullets(section: Option<&Map<String, Value>>, key: &str) -> String {
    section
        .and_then(|s| s.get(key))
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => format!("• {s}"),
                    other => format!("• {other}"),
                })
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default()
}

fn title_case(s: &str) -> String {
    s.split(|c: char| c == '_' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Plain-text report for the CEO built from the validated dashboard.
pub fn generate_executive_summary(
    dashboard: &Map<String, Value>,
    communication_type: Option<CommunicationType>,
    message_count: usize,
    team: &Option<TeamMetadata>,
) -> String {
    let summary = section(dashboard, "executive_summary");
    let insights = section(dashboard, "key_insights");
    let recommendations = section(dashboard, "actionable_recommendations");

    let risk = summary
        .and_then(|s| s.get("organizational_risk_level"))
        .and_then(Value::as_str)
        .unwrap_or("unknown");
    let kind = communication_type.map(|c| c.as_str()).unwrap_or("unknown");
    let participants = team.as_ref().map(|t| t.total_participants).unwrap_or(0);

    let report = format!(
        "CEO ORGANIZATIONAL INTELLIGENCE REPORT\n\
         \n\
         EXECUTIVE OVERVIEW:\n\
         • Team Health Score: {:.2}/1.0\n\
         • Leadership Impact: {:.2}/1.0\n\
         • Risk Level: {}\n\
         • Communication Type: {}\n\
         \n\
         KEY STRENGTHS:\n{}\n\
         \n\
         AREAS OF FOCUS:\n{}\n\
         \n\
         IMMEDIATE ACTIONS:\n{}\n\
         \n\
         Analyzed {message_count} communications from {participants} team members.",
        score(summary, "overall_team_health"),
        score(summary, "leadership_impact_score"),
        title_case(risk),
        title_case(kind),
        bullets(insights, "team_strengths"),
        bullets(insights, "areas_of_concern"),
        bullets(recommendations, "immediate_actions"),
    );

    report.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn as_map(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn renders_scores_and_lists() {
        let dashboard = as_map(json!({
            "executive_summary": {
                "overall_team_health": 0.85,
                "leadership_impact_score": 0.8,
                "organizational_risk_level": "low"
            },
            "key_insights": {
                "team_strengths": ["Good collaboration", "Mentorship"],
                "areas_of_concern": []
            },
            "actionable_recommendations": {"immediate_actions": ["Hold daily check-ins"]}
        }));
        let text = generate_executive_summary(
            &dashboard,
            Some(CommunicationType::TeamMeeting),
            12,
            &None,
        );
        assert!(text.starts_with("CEO ORGANIZATIONAL INTELLIGENCE REPORT"));
        assert!(text.contains("Team Health Score: 0.85/1.0"));
        assert!(text.contains("Leadership Impact: 0.80/1.0"));
        assert!(text.contains("Risk Level: Low"));
        assert!(text.contains("Communication Type: Team Meeting"));
        assert!(text.contains("• Good collaboration\n• Mentorship"));
        assert!(text.contains("• Hold daily check-ins"));
        assert!(text.ends_with("Analyzed 12 communications from 0 team members."));
    }

    #[test]
    fn missing_sections_fall_back() {
        let text = generate_executive_summary(&Map::new(), None, 0, &None);
        assert!(text.contains("Team Health Score: 0.00/1.0"));
        assert!(text.contains("Risk Level: Unknown"));
        assert!(text.contains("Communication Type: Unknown"));
    }

    #[test]
    fn title_case_words() {
        assert_eq!(title_case("leadership_email"), "Leadership Email");
        assert_eq!(title_case("HIGH"), "High");
    }
}
