use std::collections::BTreeSet;

use crate::ingest::keywords::{
    contains_any, ACTION_ITEM_KEYWORDS, EMAIL_LEADERSHIP_TITLES, EMPHATIC_EXCLAMATION_LIMIT,
    HIGH_INTENSITY_UPPERCASE_RATIO, NEGATIVE_EMOTION_KEYWORDS, POSITIVE_EMOTION_KEYWORDS,
    URGENCY_LEVELS,
};
use crate::models::{Message, MessageKind, ToneIndicator};

/// An email block still being read.
struct PendingEmail {
    sender: String,
    subject: Option<String>,
    urgency_level: u8,
    body: String,
}

impl PendingEmail {
    fn finish(self) -> Message {
        let is_leadership = is_email_leader(&self.sender);
        let tones = detect_tone_indicators(&self.body);
        let has_action_items = contains_any(&self.body.to_lowercase(), ACTION_ITEM_KEYWORDS);

        let mut msg = Message::new(MessageKind::Email, self.sender, self.body, is_leadership);
        msg.subject = self.subject;
        msg.urgency_level = Some(self.urgency_level);
        msg.tone_indicators = Some(tones);
        msg.has_action_items = Some(has_action_items);
        msg
    }
}

/// Parse an email thread: each `From:` line opens a new message.
///
/// `Subject:` sets the subject and urgency of the open message. Other
/// non-blank lines become body text. Lines before the first `From:` are ignored.
pub fn parse_leadership_email(content: &str) -> Vec<Message> {
    let mut messages = Vec::new();
    let mut current: Option<PendingEmail> = None;

    for line in content.split('\n') {
        if let Some(sender) = line.strip_prefix("From:") {
            if let Some(done) = current.take() {
                messages.push(done.finish());
            }
            current = Some(PendingEmail {
                sender: sender.trim().to_string(),
                subject: None,
                urgency_level: 0,
                body: String::new(),
            });
        } else if let Some(subject) = line.strip_prefix("Subject:") {
            if let Some(email) = current.as_mut() {
                let subject = subject.trim();
                email.urgency_level = assess_urgency(subject);
                email.subject = Some(subject.to_string());
            }
        } else if !line.trim().is_empty() {
            if let Some(email) = current.as_mut() {
                email.body.push_str(line);
                email.body.push('\n');
            }
        }
    }

    if let Some(done) = current {
        messages.push(done.finish());
    }

    messages
}

pub fn is_email_leader(sender: &str) -> bool {
    contains_any(&sender.to_lowercase(), EMAIL_LEADERSHIP_TITLES)
}

/// Urgency 0-3 from subject keywords; the highest matching level wins.
pub fn assess_urgency(subject: &str) -> u8 {
    let subject = subject.to_lowercase();
    URGENCY_LEVELS
        .iter()
        .find(|(_, words)| contains_any(&subject, words))
        .map(|(level, _)| *level)
        .unwrap_or(0)
}

pub fn detect_tone_indicators(content: &str) -> BTreeSet<ToneIndicator> {
    let mut tones = BTreeSet::new();
    let lower = content.to_lowercase();

    if contains_any(&lower, NEGATIVE_EMOTION_KEYWORDS) {
        tones.insert(ToneIndicator::NegativeEmotion);
    }
    if contains_any(&lower, POSITIVE_EMOTION_KEYWORDS) {
        tones.insert(ToneIndicator::PositiveEmotion);
    }

    let total = content.chars().count();
    if total > 0 {
        let upper = content.chars().filter(|c| c.is_uppercase()).count();
        if upper as f64 / total as f64 > HIGH_INTENSITY_UPPERCASE_RATIO {
            tones.insert(ToneIndicator::HighIntensity);
        }
    }

    if content.matches('!').count() > EMPHATIC_EXCLAMATION_LIMIT {
        tones.insert(ToneIndicator::Emphatic);
    }

    tones
}
