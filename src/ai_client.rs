//! Google Gemini API client for paper summaries
//!
//! Produces a Markdown summary (Problem, Method, Impact) from extracted PDF
//! text. Without an API key summarization is simply off and notes carry a
//! placeholder instead.

use crate::error::{Error, Result};
use crate::settings::GeminiConfig;
use crate::utils::truncate_chars;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const SUMMARY_UNAVAILABLE: &str = "AI Summary Unavailable.";

const PROMPT: &str = "Summarize this research paper in Markdown (Problem, Method, Impact):\n";

/// Anything that can answer a summary prompt
pub trait Summarizer {
    fn summarize(&self, prompt: &str) -> Result<String>;
}

/// What ended up in the summary section of a note
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Summary {
    Generated(String),
    /// No backend configured, or too little text to bother
    Unavailable,
    Failed(String),
}

impl Summary {
    /// Markdown body written into the note
    pub fn render(&self) -> String {
        match self {
            Summary::Generated(text) => text.clone(),
            Summary::Unavailable => SUMMARY_UNAVAILABLE.to_string(),
            Summary::Failed(e) => format!("Gemini Error: {}", e),
        }
    }
}

/// Summarize `text` if a backend is present and the text is long enough.
///
/// Only the first `max_chars` characters are sent.
pub fn summarize_paper(
    summarizer: Option<&dyn Summarizer>,
    text: &str,
    min_chars: usize,
    max_chars: usize,
) -> Summary {
    let Some(summarizer) = summarizer else {
        return Summary::Unavailable;
    };
    if text.chars().count() <= min_chars {
        tracing::debug!("extracted text too short to summarize");
        return Summary::Unavailable;
    }

    let prompt = format!("{}{}", PROMPT, truncate_chars(text, max_chars));
    match summarizer.summarize(&prompt) {
        Ok(summary) => Summary::Generated(summary),
        Err(e) => {
            tracing::warn!("Gemini Error: {}", e);
            Summary::Failed(e.to_string())
        }
    }
}

/// Gemini API request format
#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

/// Gemini API response format
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct ResponseCandidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u64,
    #[serde(default)]
    candidates_token_count: u64,
}

pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(180))
            .build()?;
        Ok(Self { client, config })
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }
}

impl Summarizer for GeminiClient {
    fn summarize(&self, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(Error::Summarize(format!("API error {}: {}", status, body)));
        }

        let parsed: GenerateResponse = response.json()?;
        if let Some(usage) = &parsed.usage_metadata {
            tracing::debug!(
                input_tokens = usage.prompt_token_count,
                output_tokens = usage.candidates_token_count,
                "Gemini usage"
            );
        }
        response_text(parsed)
    }
}

/// Concatenated text parts of the first candidate
fn response_text(response: GenerateResponse) -> Result<String> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(Error::Summarize("response contained no text".to_string()));
    }
    Ok(text)
}
