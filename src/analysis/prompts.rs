//! Prompt templates for the three model-backed stages.

use serde_json::{Map, Value};

use crate::models::{metadata_to_value, Message, TeamMetadata};

pub const LEADERSHIP_PERSONA: &str =
    "You are a senior organizational consultant who assesses leadership effectiveness for CEOs.";
pub const ALIGNMENT_PERSONA: &str =
    "You are a strategic advisor who helps CEOs read organizational health and culture.";
pub const SYNTHESIS_PERSONA: &str =
    "You are the CEO's chief of staff, turning organizational analysis into concrete strategic guidance.";

const JSON_ONLY: &str =
    "Answer with a single valid JSON object and nothing else: no prose, no markdown fences.";

const LEADERSHIP_SCHEMA: &str = r#"{
  "leadership_effectiveness": {
    "communication_clarity": <0.0-1.0>,
    "team_engagement_fostered": <0.0-1.0>,
    "decision_making_efficiency": <0.0-1.0>,
    "psychological_safety_created": <0.0-1.0>
  },
  "leadership_style_indicators": {
    "directive_vs_collaborative": <-1.0-1.0>,
    "micromanaging_signals": <0.0-1.0>,
    "empowerment_level": <0.0-1.0>,
    "transparency_score": <0.0-1.0>
  },
  "team_response_patterns": {
    "openness_to_share": <0.0-1.0>,
    "innovation_comfort": <0.0-1.0>,
    "dissent_expression": <0.0-1.0>,
    "engagement_energy": <0.0-1.0>
  },
  "red_flags": ["..."],
  "positive_leadership_moments": ["..."]
}"#;

const ALIGNMENT_SCHEMA: &str = r#"{
  "organizational_alignment": {
    "goal_clarity": <0.0-1.0>,
    "priority_consensus": <0.0-1.0>,
    "role_clarity": <0.0-1.0>,
    "strategic_understanding": <0.0-1.0>
  },
  "cultural_health_indicators": {
    "collaboration_quality": <0.0-1.0>,
    "innovation_mindset": <0.0-1.0>,
    "accountability_culture": <0.0-1.0>,
    "learning_orientation": <0.0-1.0>
  },
  "information_flow": {
    "upward_transparency": <0.0-1.0>,
    "lateral_coordination": <0.0-1.0>,
    "decision_communication": <0.0-1.0>
  },
  "early_warning_signals": ["..."],
  "cultural_strengths": ["..."],
  "recommended_interventions": ["..."]
}"#;

const DASHBOARD_SCHEMA: &str = r#"{
  "executive_summary": {
    "overall_team_health": <0.0-1.0>,
    "leadership_impact_score": <0.0-1.0>,
    "organizational_risk_level": "low|medium|high|critical",
    "intervention_urgency": "none|monitor|action_needed|immediate"
  },
  "key_insights": {
    "team_strengths": ["..."],
    "areas_of_concern": ["..."],
    "leadership_opportunities": ["..."],
    "cultural_evolution": "positive|stable|declining|concerning"
  },
  "actionable_recommendations": {
    "immediate_actions": ["..."],
    "30_day_focus_areas": ["..."],
    "strategic_initiatives": ["..."]
  },
  "performance_metrics": {
    "team_collaboration_index": <0.0-1.0>,
    "innovation_capacity_score": <0.0-1.0>,
    "execution_effectiveness": <0.0-1.0>,
    "talent_retention_risk": <0.0-1.0>
  },
  "next_conversation_focus": ["..."],
  "success_indicators_to_monitor": ["..."]
}"#;

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

pub fn leadership_prompt(messages: &[Message], team: &Option<TeamMetadata>, window: usize) -> String {
    let leaders = messages.iter().filter(|m| m.is_leadership).count();
    let team_count = messages.len() - leaders;

    let conversation = messages
        .iter()
        .take(window)
        .map(|m| {
            let role = if m.is_leadership { "LEADER" } else { "TEAM" };
            format!("[{role}] {}: {}", m.speaker, m.content.trim_end())
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Assess how effectively leadership communicates in the exchange below.\n\n\
         {conversation}\n\n\
         Contributions: {leaders} from leadership, {team_count} from the team.\n\
         Team metadata:\n{}\n\n\
         {JSON_ONLY}\n\n\
         Expected shape:\n{LEADERSHIP_SCHEMA}\n",
        pretty(&metadata_to_value(team))
    )
}

pub fn alignment_prompt(messages: &[Message], team: &Option<TeamMetadata>, window: usize) -> String {
    let conversation = messages
        .iter()
        .take(window)
        .map(|m| format!("{}: {}", m.speaker, m.content.trim_end()))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Assess organizational alignment and cultural health in the exchange below.\n\n\
         {conversation}\n\n\
         Team metadata:\n{}\n\n\
         {JSON_ONLY}\n\n\
         Expected shape:\n{ALIGNMENT_SCHEMA}\n",
        pretty(&metadata_to_value(team))
    )
}

pub fn synthesis_prompt(
    leadership: &Map<String, Value>,
    alignment: &Map<String, Value>,
    team: &Option<TeamMetadata>,
) -> String {
    let combined = serde_json::json!({
        "leadership_analysis": leadership,
        "alignment_analysis": alignment,
        "team_metadata": metadata_to_value(team),
    });

    format!(
        "Combine the analyses below into a CEO dashboard of actionable insights.\n\n\
         {}\n\n\
         {JSON_ONLY}\n\n\
         Expected shape:\n{DASHBOARD_SCHEMA}\n",
        pretty(&combined)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::dynamics::extract_team_dynamics;
    use crate::ingest::meeting::parse_team_meeting;

    #[test]
    fn leadership_prompt_tags_roles_and_counts() {
        let msgs = parse_team_meeting("Sam: hello\nManager Jo: let's decide");
        let meta = extract_team_dynamics(&msgs);
        let prompt = leadership_prompt(&msgs, &meta, 25);
        assert!(prompt.contains("[TEAM] Sam: hello"));
        assert!(prompt.contains("[LEADER] Manager Jo: let's decide"));
        assert!(prompt.contains("1 from leadership, 1 from the team"));
        assert!(prompt.contains("\"total_participants\": 2"));
        assert!(prompt.contains("psychological_safety_created"));
    }

    #[test]
    fn conversation_window_limits_messages() {
        let input: String = (0..30).map(|i| format!("P{i}: line {i}\n")).collect();
        let msgs = parse_team_meeting(&input);
        let prompt = alignment_prompt(&msgs, &None, 25);
        assert!(prompt.contains("P24: line 24"));
        assert!(!prompt.contains("P25: line 25"));
        assert!(prompt.contains("Team metadata:\n{}"));
    }

    #[test]
    fn synthesis_prompt_embeds_analyses() {
        let mut leadership = Map::new();
        leadership.insert("red_flags".into(), serde_json::json!(["silence"]));
        let prompt = synthesis_prompt(&leadership, &Map::new(), &None);
        assert!(prompt.contains("\"leadership_analysis\""));
        assert!(prompt.contains("silence"));
        assert!(prompt.contains("performance_metrics"));
    }
}
