//! Keyword and title tables used by the parsers and the format detector.
//! All entries are lowercase; callers lowercase the haystack first.

/// Titles that mark a meeting speaker as leadership.
pub const MEETING_LEADERSHIP_TITLES: &[&str] =
    &["manager", "director", "lead", "head", "ceo", "cto", "vp"];

/// Titles that mark an email sender as leadership.
pub const EMAIL_LEADERSHIP_TITLES: &[&str] = &["executive", "ceo", "cto", "vp", "director", "head"];

pub const DECISION_KEYWORDS: &[&str] = &["decide", "decision", "will do", "action item"];

pub const ACTION_ITEM_KEYWORDS: &[&str] = &["action", "task", "deliverable", "deadline"];

/// Subject keywords by urgency level, highest first.
pub const URGENCY_LEVELS: &[(u8, &[&str])] = &[
    (3, &["urgent", "asap", "immediate", "critical", "emergency"]),
    (2, &["important", "priority"]),
    (1, &["fyi", "update", "info"]),
];

pub const NEGATIVE_EMOTION_KEYWORDS: &[&str] = &["disappointed", "concerned", "frustrated"];

pub const POSITIVE_EMOTION_KEYWORDS: &[&str] = &["excited", "great", "excellent", "fantastic"];

pub const ALL_HANDS_MARKERS: &[&str] = &["all hands", "company meeting", "quarterly"];

/// Uppercase share above which content reads as shouting.
pub const HIGH_INTENSITY_UPPERCASE_RATIO: f64 = 0.1;

/// More exclamation marks than this is emphatic.
pub const EMPHATIC_EXCLAMATION_LIMIT: usize = 2;

pub fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_any_matches_substrings() {
        assert!(contains_any("we will do it", DECISION_KEYWORDS));
        assert!(contains_any("project manager", MEETING_LEADERSHIP_TITLES));
        assert!(!contains_any("project", MEETING_LEADERSHIP_TITLES));
        assert!(!contains_any("", ACTION_ITEM_KEYWORDS));
    }
}
