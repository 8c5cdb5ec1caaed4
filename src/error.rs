use thiserror::Error;

/// Errors surfaced by the analysis pipeline.
///
/// Slack parse failures never show up here: the slack parser recovers them
/// locally by falling back to the meeting parser.
#[derive(Debug, Error)]
pub enum CompassError {
    /// No JSON object could be recovered from a model reply.
    #[error("JSON parsing failed: {0}")]
    Parse(String),

    /// The synthesized dashboard is missing a section or has an out-of-range metric.
    #[error("Dashboard schema violation: {0}")]
    Schema(String),

    /// The completion service could not produce a reply.
    #[error("Completion request failed: {0}")]
    Llm(String),

    /// A pipeline stage failed; wraps the underlying cause.
    #[error("{stage} failed: {source}")]
    Stage {
        stage: &'static str,
        #[source]
        source: Box<CompassError>,
    },
}

impl CompassError {
    pub fn stage(stage: &'static str, source: CompassError) -> Self {
        CompassError::Stage {
            stage,
            source: Box::new(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, CompassError>;
