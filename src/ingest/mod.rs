pub mod email;
pub mod keywords;
pub mod meeting;
pub mod slack;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::models::Message;

/// Shape of the raw communication being analyzed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommunicationType {
    TeamMeeting,
    LeadershipEmail,
    AllHands,
    SlackChannel,
}

impl CommunicationType {
    /// Parse a type name. `auto` is not a type: callers map it to `None`.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "team_meeting" | "meeting" => Some(CommunicationType::TeamMeeting),
            "leadership_email" | "email" => Some(CommunicationType::LeadershipEmail),
            "all_hands" => Some(CommunicationType::AllHands),
            "slack_channel" | "slack" => Some(CommunicationType::SlackChannel),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CommunicationType::TeamMeeting => "team_meeting",
            CommunicationType::LeadershipEmail => "leadership_email",
            CommunicationType::AllHands => "all_hands",
            CommunicationType::SlackChannel => "slack_channel",
        }
    }

    /// Guess the type of untyped input. Rules are checked in order.
    pub fn detect(raw: &str) -> Self {
        if raw.contains("From:") && raw.contains('@') {
            CommunicationType::LeadershipEmail
        } else if keywords::contains_any(&raw.to_lowercase(), keywords::ALL_HANDS_MARKERS) {
            CommunicationType::AllHands
        } else if raw.contains("user") && raw.contains("ts") {
            // Loose on purpose: matches any text with both substrings.
            CommunicationType::SlackChannel
        } else {
            CommunicationType::TeamMeeting
        }
    }
}

impl fmt::Display for CommunicationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve a CLI/config type string; `auto` and `None` mean "detect".
pub fn parse_type_arg(arg: Option<&str>) -> Result<Option<CommunicationType>> {
    match arg {
        None => Ok(None),
        Some(s) if s.eq_ignore_ascii_case("auto") => Ok(None),
        Some(s) => CommunicationType::from_str(s).map(Some).with_context(|| {
            format!("Unknown type: {s}. Use: auto, team_meeting, leadership_email, all_hands, slack_channel")
        }),
    }
}

/// Normalize raw text into messages with the parser for `kind`.
pub fn parse_messages(raw: &str, kind: CommunicationType) -> Vec<Message> {
    match kind {
        CommunicationType::TeamMeeting => meeting::parse_team_meeting(raw),
        CommunicationType::LeadershipEmail => email::parse_leadership_email(raw),
        CommunicationType::AllHands => meeting::parse_all_hands(raw),
        CommunicationType::SlackChannel => slack::parse_slack_channel(raw),
    }
}

/// A raw input document and where it came from.
#[derive(Debug, Clone)]
pub struct Document {
    pub name: String,
    pub content: String,
}

/// Read one document from stdin.
pub fn read_stdin() -> Result<Document> {
    let mut content = String::new();
    std::io::stdin()
        .read_to_string(&mut content)
        .context("Failed to read from stdin")?;

    if content.trim().is_empty() {
        bail!("Empty input from stdin");
    }

    Ok(Document {
        name: "stdin".to_string(),
        content,
    })
}

pub fn read_file(path: &Path) -> Result<Document> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read: {}", path.display()))?;
    Ok(Document {
        name: path.display().to_string(),
        content,
    })
}

/// Expand files, directories and glob patterns into a sorted list of files.
pub fn collect_paths(paths: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path_str in paths {
        let path = Path::new(path_str);
        if path.is_dir() {
            collect_directory(path, &mut files)?;
        } else if path.is_file() {
            files.push(path.to_path_buf());
        } else {
            let matches: Vec<_> = glob::glob(path_str)
                .with_context(|| format!("Invalid path or glob pattern: {path_str}"))?
                .filter_map(|r| r.ok())
                .filter(|p| p.is_file())
                .collect();

            if matches.is_empty() {
                bail!("No files found matching: {path_str}");
            }
            files.extend(matches);
        }
    }

    Ok(files)
}

fn collect_directory(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries: Vec<_> = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?
        .filter_map(|e| e.ok())
        .collect();
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();
        if path.is_dir() {
            collect_directory(&path, files)?;
        } else if is_supported_extension(&path) {
            files.push(path);
        }
    }
    Ok(())
}

fn is_supported_extension(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("txt" | "text" | "eml" | "json" | "md")
    )
}
