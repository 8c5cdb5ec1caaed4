use crate::ingest::keywords::{contains_any, MEETING_LEADERSHIP_TITLES};
use crate::models::{Message, MessageKind};

/// Parse `Speaker: text` lines of a meeting transcript.
///
/// A line counts only if it has a colon and does not start with `Time:`.
/// Everything before the first colon is the speaker.
pub fn parse_team_meeting(content: &str) -> Vec<Message> {
    content
        .split('\n')
        .filter(|line| !line.starts_with("Time:"))
        .filter_map(|line| line.split_once(':'))
        .map(|(speaker, text)| {
            let speaker = speaker.trim().to_string();
            let is_leadership = is_meeting_leader(&speaker);
            Message::new(
                MessageKind::MeetingContribution,
                speaker,
                text.trim().to_string(),
                is_leadership,
            )
        })
        .collect()
}

/// Same line format as a team meeting, tagged as company-wide.
pub fn parse_all_hands(content: &str) -> Vec<Message> {
    parse_team_meeting(content)
        .into_iter()
        .map(|mut msg| {
            msg.kind = MessageKind::AllHandsContribution;
            msg.visibility = Some("company_wide".to_string());
            msg
        })
        .collect()
}

pub fn is_meeting_leader(speaker: &str) -> bool {
    contains_any(&speaker.to_lowercase(), MEETING_LEADERSHIP_TITLES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn one_message_per_colon_line() {
        let input = "Time: 10:00\nAlice: morning all\nno colon here\n\nBob: hi: there\n";
        let msgs = parse_team_meeting(input);
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].speaker, "Alice");
        assert_eq!(msgs[0].content, "morning all");
        assert_eq!(msgs[1].speaker, "Bob");
        assert_eq!(msgs[1].content, "hi: there");
    }

    #[test]
    fn leadership_is_case_insensitive_title_substring() {
        assert!(is_meeting_leader("Project Manager"));
        assert!(is_meeting_leader("Manager"));
        assert!(is_meeting_leader("Sarah (Engineering MANAGER)"));
        assert!(!is_meeting_leader("Project"));
    }

    #[test]
    fn derived_fields() {
        let msgs = parse_team_meeting("Sam: hello\nManager Jo: let's decide on the budget?");
        assert_eq!(msgs.len(), 2);
        assert!(!msgs[0].is_leadership);
        assert!(!msgs[0].has_decisions);
        assert_eq!(msgs[0].word_count, 1);
        assert!(msgs[1].is_leadership);
        assert!(msgs[1].has_decisions);
        assert!(msgs[1].has_questions);
        assert_eq!(msgs[1].word_count, 5);
        assert_eq!(msgs[1].kind, MessageKind::MeetingContribution);
    }

    #[test]
    fn indented_time_line_still_counts() {
        // Only a literal `Time:` prefix is skipped.
        let msgs = parse_team_meeting("  Time: 10:00");
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].speaker, "Time");
    }

    #[test]
    fn all_hands_tags_company_wide() {
        let msgs = parse_all_hands("CEO: Welcome to the all hands\nDana: thanks");
        assert_eq!(msgs.len(), 2);
        assert!(msgs.iter().all(|m| m.kind == MessageKind::AllHandsContribution));
        assert!(msgs.iter().all(|m| m.visibility.as_deref() == Some("company_wide")));
        assert!(msgs[0].is_leadership);
    }
}
