use serde_json::{Map, Value};
use unicode_width::UnicodeWidthStr;

use crate::analysis::AnalysisOutcome;
use crate::ingest::CommunicationType;
use crate::models::{Message, TeamMetadata};

/// Truncate a string to fit within max_width (respecting unicode width).
fn truncate(s: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let cw = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if width + cw + 3 > max_width {
            result.push_str("...");
            break;
        }
        result.push(ch);
        width += cw;
    }
    result
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

/// Print normalized messages for `compass parse`.
pub fn print_messages(name: &str, kind: CommunicationType, messages: &[Message]) {
    println!("{name} ({kind}): {} message{}\n", messages.len(), plural(messages.len()));
    if messages.is_empty() {
        return;
    }

    println!("  {:<24} {:>5} {:<5} {:<44}", "SPEAKER", "WORDS", "FLAGS", "CONTENT");
    println!("  {}", "-".repeat(80));

    for m in messages {
        let mut flags = String::new();
        flags.push(if m.is_leadership { 'L' } else { '-' });
        flags.push(if m.has_questions { 'Q' } else { '-' });
        flags.push(if m.has_decisions { 'D' } else { '-' });
        if let Some(level) = m.urgency_level {
            flags.push(char::from(b'0' + level.min(9)));
        }
        println!(
            "  {:<24} {:>5} {:<5} {}",
            truncate(&m.speaker, 24),
            m.word_count,
            flags,
            truncate(&m.content.trim().replace('\n', " "), 44),
        );
    }
    println!();
}

/// Print participation statistics.
pub fn print_team_metadata(team: &Option<TeamMetadata>) {
    let Some(team) = team else {
        println!("No messages found.");
        return;
    };

    println!("Team Dynamics:");
    println!("  Participants:          {}", team.total_participants);
    println!("  Leadership share:      {:.0}%", team.leadership_participation_rate * 100.0);
    println!("  Participation balance: {:.2}", team.participation_balance);
    println!("  Questions:             {}", team.total_questions);
    println!("  Decisions:             {}", team.total_decisions);
    println!("  Avg message length:    {:.1} words", team.average_message_length);

    println!("\n  {:<28} {:>5} {:>6} {:>4} {:>4}", "SPEAKER", "MSGS", "WORDS", "Q", "D");
    println!("  {}", "-".repeat(51));
    for (speaker, s) in &team.speaker_statistics {
        let name = if s.is_leadership {
            format!("{speaker} *")
        } else {
            speaker.clone()
        };
        println!(
            "  {:<28} {:>5} {:>6} {:>4} {:>4}",
            truncate(&name, 28),
            s.message_count,
            s.total_words,
            s.questions_asked,
            s.decisions_made,
        );
    }
    println!();
}

fn print_scores(title: &str, section: Option<&Value>) {
    let Some(Value::Object(scores)) = section else {
        return;
    };
    println!("{title}:");
    for (name, value) in scores {
        match value.as_f64() {
            Some(score) => println!("  {:<32} {score:.2}", name.replace('_', " ")),
            None => println!("  {:<32} {}", name.replace('_', " "), value),
        }
    }
    println!();
}

/// Print the result of `compass analyze`.
pub fn print_outcome(outcome: &AnalysisOutcome) {
    match outcome {
        AnalysisOutcome::Failed { error } => {
            println!("Analysis failed: {error}");
        }
        AnalysisOutcome::Success {
            ceo_dashboard,
            team_metadata,
            executive_summary,
            ..
        } => {
            println!("{executive_summary}\n");
            print_scores("Performance Metrics", ceo_dashboard.get("performance_metrics"));
            print_team_metadata(team_metadata);
            print_analysis_id(ceo_dashboard);
        }
    }
}

fn print_analysis_id(dashboard: &Map<String, Value>) {
    if let Some(id) = dashboard
        .get("analysis_metadata")
        .and_then(|m| m.get("analysis_id"))
        .and_then(Value::as_str)
    {
        println!("  analysis id: {id}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_width() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a much longer line", 10), "a much ...");
        assert_eq!(UnicodeWidthStr::width(truncate("会議の議事録です", 9).as_str()), 9);
    }
}
