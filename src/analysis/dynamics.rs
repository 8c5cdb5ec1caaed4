use std::collections::BTreeMap;

use crate::models::{Message, SpeakerStats, TeamMetadata};

/// Participation statistics over a message sequence.
///
/// Returns `None` for an empty sequence; it serializes as `{}`.
pub fn extract_team_dynamics(messages: &[Message]) -> Option<TeamMetadata> {
    if messages.is_empty() {
        return None;
    }
    let total_messages = messages.len();

    let leadership_messages = messages.iter().filter(|m| m.is_leadership).count();
    let leadership_participation_rate = leadership_messages as f64 / total_messages as f64;

    let mut speaker_statistics: BTreeMap<String, SpeakerStats> = BTreeMap::new();
    for msg in messages {
        let stats = speaker_statistics
            .entry(msg.speaker.clone())
            .or_insert_with(|| SpeakerStats {
                is_leadership: msg.is_leadership,
                ..SpeakerStats::default()
            });
        stats.message_count += 1;
        stats.total_words += msg.word_count;
        if msg.has_questions {
            stats.questions_asked += 1;
        }
        if msg.has_decisions {
            stats.decisions_made += 1;
        }
    }

    let total_words: usize = speaker_statistics.values().map(|s| s.total_words).sum();
    let max_words = speaker_statistics
        .values()
        .map(|s| s.total_words)
        .max()
        .unwrap_or(0);
    let participation_balance = participation_balance(max_words, total_words);

    Some(TeamMetadata {
        total_participants: speaker_statistics.len(),
        leadership_participation_rate,
        participation_balance,
        speaker_statistics,
        total_questions: messages.iter().filter(|m| m.has_questions).count(),
        total_decisions: messages.iter().filter(|m| m.has_decisions).count(),
        average_message_length: total_words as f64 / total_messages as f64,
    })
}

/// `1 - max/sum` over per-speaker word totals; 0 when nobody said anything.
/// A concentration approximation, not a Gini coefficient.
fn participation_balance(max_words: usize, total_words: usize) -> f64 {
    if total_words == 0 {
        return 0.0;
    }
    1.0 - max_words as f64 / total_words as f64
}
