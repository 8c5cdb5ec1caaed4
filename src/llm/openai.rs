use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::error::{CompassError, Result};
use crate::llm::{CompletionRequest, CompletionService};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequestBody<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageOut,
}

#[derive(Debug, Deserialize)]
struct ChatMessageOut {
    content: Option<String>,
}

/// Blocking client for an OpenAI-compatible chat completions endpoint.
pub struct OpenAiClient {
    api_key: String,
    base_url: String,
    max_retries: u32,
    client: reqwest::blocking::Client,
}

impl OpenAiClient {
    pub fn new(api_key: String, base_url: &str, timeout: Duration, max_retries: u32) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CompassError::Llm(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_retries,
            client,
        })
    }

    fn send_once(&self, body: &ChatRequestBody<'_>) -> std::result::Result<String, Attempt> {
        let url = format!("{}/chat/completions", self.base_url);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .map_err(|e| Attempt::Retry(format!("Failed to send request: {e}")))?;

        let status = resp.status();
        let text = resp
            .text()
            .map_err(|e| Attempt::Retry(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            let msg = format!("API returned {status}: {text}");
            return Err(if status.as_u16() == 429 || status.is_server_error() {
                Attempt::Retry(msg)
            } else {
                Attempt::Fatal(msg)
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| Attempt::Fatal(format!("Unexpected response body ({e}): {text}")))?;

        Ok(parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default())
    }
}

enum Attempt {
    Retry(String),
    Fatal(String),
}

impl CompletionService for OpenAiClient {
    fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let body = ChatRequestBody {
            model: &request.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            temperature: request.temperature,
        };

        let mut attempt = 0;
        loop {
            match self.send_once(&body) {
                Ok(content) => return Ok(content),
                Err(Attempt::Fatal(msg)) => return Err(CompassError::Llm(msg)),
                Err(Attempt::Retry(msg)) if attempt >= self.max_retries => {
                    return Err(CompassError::Llm(msg));
                }
                Err(Attempt::Retry(msg)) => {
                    attempt += 1;
                    debug!("Completion attempt {attempt} failed, retrying: {msg}");
                    std::thread::sleep(Duration::from_millis(500 * u64::from(attempt)));
                }
            }
        }
    }
}
