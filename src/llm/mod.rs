pub mod openai;

use crate::error::Result;

/// One prompt sent to the completion service.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: String,
    pub prompt: String,
    pub model: String,
    pub temperature: f32,
}

/// Anything that turns a prompt into free-form text.
///
/// The reply may contain one JSON object somewhere in it; nothing else is assumed.
pub trait CompletionService {
    fn complete(&self, request: &CompletionRequest) -> Result<String>;
}
