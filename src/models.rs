use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};

/// Kind tag carried by every normalized message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    MeetingContribution,
    Email,
    AllHandsContribution,
    SlackMessage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToneIndicator {
    NegativeEmotion,
    PositiveEmotion,
    HighIntensity,
    Emphatic,
}

/// One utterance: a transcript line, an email block or a chat record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub speaker: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub is_leadership: bool,
    pub word_count: usize,
    pub has_questions: bool,
    pub has_decisions: bool,

    // Email
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urgency_level: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tone_indicators: Option<BTreeSet<ToneIndicator>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_action_items: Option<bool>,

    // All hands
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,

    // Slack
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_ts: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reactions: Option<Vec<serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_thread_reply: Option<bool>,
}

impl Message {
    /// Build a message with the derived fields every format shares.
    /// Format-specific fields start out empty.
    pub fn new(kind: MessageKind, speaker: String, content: String, is_leadership: bool) -> Self {
        let word_count = content.split_whitespace().count();
        let has_questions = content.contains('?');
        let has_decisions = crate::ingest::keywords::contains_any(
            &content.to_lowercase(),
            crate::ingest::keywords::DECISION_KEYWORDS,
        );
        Self {
            speaker,
            content,
            kind,
            is_leadership,
            word_count,
            has_questions,
            has_decisions,
            subject: None,
            urgency_level: None,
            tone_indicators: None,
            has_action_items: None,
            visibility: None,
            timestamp: None,
            thread_ts: None,
            reactions: None,
            is_thread_reply: None,
        }
    }
}

/// Per-speaker participation counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeakerStats {
    pub message_count: usize,
    pub total_words: usize,
    pub questions_asked: usize,
    pub decisions_made: usize,
    pub is_leadership: bool,
}

/// Aggregate participation statistics over a message sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMetadata {
    pub total_participants: usize,
    pub leadership_participation_rate: f64,
    pub participation_balance: f64,
    pub speaker_statistics: BTreeMap<String, SpeakerStats>,
    pub total_questions: usize,
    pub total_decisions: usize,
    pub average_message_length: f64,
}

/// Serialize absent team metadata as `{}` rather than `null`.
pub fn serialize_metadata<S: Serializer>(
    value: &Option<TeamMetadata>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match value {
        Some(meta) => meta.serialize(serializer),
        None => serde_json::Map::new().serialize(serializer),
    }
}

/// Render team metadata as JSON, empty object when absent.
pub fn metadata_to_value(value: &Option<TeamMetadata>) -> serde_json::Value {
    match value {
        Some(meta) => serde_json::to_value(meta)
            .unwrap_or_else(|_| serde_json::Value::Object(serde_json::Map::new())),
        None => serde_json::Value::Object(serde_json::Map::new()),
    }
}
