use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

use super::Summarizer;

const CLAUDE_API_URL: &str = "https://api.anthropic.com/v1/messages";
const CLAUDE_MODEL: &str = "claude-3-5-haiku-20241022";
const MAX_CONTENT_CHARS: usize = 10_000;

const SYSTEM_PROMPT: &str = r#"You summarize web articles saved for later reading.
Reply with a single short paragraph of at most three sentences.
Keep the key facts and the main conclusion. No preamble."#;

#[derive(Debug, Serialize)]
struct MessageRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
    system: Option<String>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    text: Option<String>,
}

/// Summaries through the Anthropic Messages API. Used when an API key is
/// configured.
pub struct ClaudeSummarizer {
    client: Client,
    api_key: String,
}

impl ClaudeSummarizer {
    pub fn new(api_key: String) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(60)).build()?;
        Ok(Self { client, api_key })
    }
}

#[async_trait]
impl Summarizer for ClaudeSummarizer {
    async fn summarize(&self, title: &str, content: &str) -> Result<String> {
        let content = truncate_chars(content, MAX_CONTENT_CHARS);

        let request = MessageRequest {
            model: CLAUDE_MODEL.to_string(),
            max_tokens: 512,
            messages: vec![Message {
                role: "user".to_string(),
                content: format!(
                    "Please summarize the following article:\n\nTitle: {}\n\nContent:\n{}",
                    title, content
                ),
            }],
            system: Some(SYSTEM_PROMPT.to_string()),
        };

        let response = self
            .client
            .post(CLAUDE_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            return Err(AppError::SummaryApi(format!("API error: {}", error_text)));
        }

        let message_response: MessageResponse = response.json().await?;

        let summary = message_response
            .content
            .into_iter()
            .filter_map(|block| block.text)
            .collect::<Vec<_>>()
            .join("\n");

        Ok(summary.trim().to_string())
    }

    fn name(&self) -> &str {
        CLAUDE_MODEL
    }
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
