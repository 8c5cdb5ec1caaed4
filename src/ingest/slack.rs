use serde::{Deserialize, Deserializer};
use tracing::debug;

use crate::ingest::meeting::parse_team_meeting;
use crate::models::{Message, MessageKind};

/// One record of a Slack channel export.
#[derive(Debug, Deserialize)]
pub struct SlackRecord {
    pub user: Option<String>,
    pub text: Option<String>,
    pub ts: Option<String>,
    /// Outer `Some` when the key is present, even as `null`.
    #[serde(default, deserialize_with = "present")]
    pub thread_ts: Option<Option<String>>,
    pub reactions: Option<Vec<serde_json::Value>>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Parse a Slack export (JSON array of message objects).
///
/// Input that is not a valid export is parsed as a meeting transcript instead.
/// Slack user IDs carry no title, so no Slack message is marked leadership.
pub fn parse_slack_channel(content: &str) -> Vec<Message> {
    match serde_json::from_str::<Vec<SlackRecord>>(content) {
        Ok(records) => records.into_iter().map(record_to_message).collect(),
        Err(e) => {
            debug!("Slack export did not parse ({e}), falling back to meeting parser");
            parse_team_meeting(content)
        }
    }
}

fn record_to_message(record: SlackRecord) -> Message {
    let speaker = record.user.unwrap_or_else(|| "unknown".to_string());
    let is_thread_reply = matches!(&record.thread_ts, Some(thread) if *thread != record.ts);

    let mut msg = Message::new(
        MessageKind::SlackMessage,
        speaker,
        record.text.unwrap_or_default(),
        false,
    );
    msg.timestamp = Some(record.ts.unwrap_or_default());
    msg.thread_ts = record.thread_ts.flatten();
    msg.reactions = Some(record.reactions.unwrap_or_default());
    msg.is_thread_reply = Some(is_thread_reply);
    msg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::dynamics::extract_team_dynamics;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_export() {
        let input = r#"[
            {"user": "U1", "text": "Should we ship?", "ts": "1.0"},
            {"user": "U2", "text": "yes", "ts": "2.0", "thread_ts": "1.0",
             "reactions": [{"name": "+1", "count": 2}]},
            {"user": "U3", "text": "root", "ts": "3.0", "thread_ts": "3.0"}
        ]"#;
        let msgs = parse_slack_channel(input);
        assert_eq!(msgs.len(), 3);
        assert_eq!(msgs[0].kind, MessageKind::SlackMessage);
        assert!(msgs[0].has_questions);
        assert_eq!(msgs[0].is_thread_reply, Some(false));
        assert_eq!(msgs[1].is_thread_reply, Some(true));
        assert_eq!(msgs[1].thread_ts.as_deref(), Some("1.0"));
        assert_eq!(msgs[1].reactions.as_ref().map(Vec::len), Some(1));
        assert_eq!(msgs[2].is_thread_reply, Some(false));
        assert_eq!(msgs[0].timestamp.as_deref(), Some("1.0"));
    }

    #[test]
    fn missing_fields_get_defaults() {
        let msgs = parse_slack_channel(r#"[{"text": "hi"}, {"user": "vp_eng"}]"#);
        assert_eq!(msgs[0].speaker, "unknown");
        assert_eq!(msgs[1].content, "");
        assert!(!msgs[1].is_leadership);
        assert_eq!(msgs[1].word_count, 0);
    }

    #[test]
    fn user_ids_never_mark_leadership() {
        let input = r#"[
            {"user": "U0VPK2H3L", "text": "status?", "ts": "1.0"},
            {"user": "U02LEAD9Q", "text": "on track", "ts": "2.0"},
            {"user": "U01ABC", "text": "agreed", "ts": "3.0"}
        ]"#;
        let msgs = parse_slack_channel(input);
        assert!(msgs.iter().all(|m| !m.is_leadership));

        let meta = extract_team_dynamics(&msgs).unwrap();
        assert_eq!(meta.leadership_participation_rate, 0.0);
    }

    #[test]
    fn null_thread_ts_counts_as_reply() {
        let msgs = parse_slack_channel(
            r#"[
                {"user": "U1", "text": "x", "ts": "5.0", "thread_ts": null},
                {"user": "U2", "text": "y", "thread_ts": null},
                {"user": "U3", "text": "z", "ts": "6.0"}
            ]"#,
        );
        assert_eq!(msgs[0].is_thread_reply, Some(true));
        assert_eq!(msgs[0].thread_ts, None);
        assert_eq!(msgs[1].is_thread_reply, Some(false));
        assert_eq!(msgs[2].is_thread_reply, Some(false));
    }

    #[test]
    fn invalid_json_falls_back_to_meeting_parser() {
        let msgs = parse_slack_channel("user Ann: the ts field is missing");
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].kind, MessageKind::MeetingContribution);
        assert_eq!(msgs[0].speaker, "user Ann");
    }
}
