//! HTTP client for an OpenAI-compatible chat-completions API.
//!
//! One request per batch, no retry. Callers treat any error as a signal to
//! fall back to locally formatted summaries.

use std::time::Duration;

use radar_core::{DescriptionGenerator, RestroomRecord};
use reqwest::{Client, Url};

use crate::error::SummarizerError;
use crate::prompt::{build_prompt, parse_descriptions};
use crate::types::{ChatMessage, ChatRequest, ChatResponse};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const TOKENS_PER_RECORD: u32 = 30;
const TEMPERATURE: f32 = 0.5;

/// Client for the `chat/completions` endpoint.
///
/// Use [`ChatSummarizer::new`] for production or
/// [`ChatSummarizer::with_base_url`] to point at a mock server in tests.
pub struct ChatSummarizer {
    client: Client,
    api_key: String,
    model: String,
    endpoint: Url,
}

impl std::fmt::Debug for ChatSummarizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSummarizer")
            .field("api_key", &"[redacted]")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

impl ChatSummarizer {
    /// Creates a client pointed at the public OpenAI API.
    ///
    /// # Errors
    ///
    /// Returns [`SummarizerError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, model: &str, timeout_secs: u64) -> Result<Self, SummarizerError> {
        Self::with_base_url(api_key, model, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL, e.g. `http://127.0.0.1:1234/v1`.
    ///
    /// # Errors
    ///
    /// Returns [`SummarizerError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`SummarizerError::InvalidBaseUrl`] if `base_url` does
    /// not parse.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, SummarizerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(5))
            .user_agent("restroom-radar/0.1")
            .build()?;

        // Trailing slash so `join` appends rather than replacing the last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&normalised)
            .and_then(|base| base.join("chat/completions"))
            .map_err(|e| SummarizerError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            model: model.to_owned(),
            endpoint,
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Asks the model for one description per record.
    ///
    /// The returned list may be shorter or longer than `records`.
    ///
    /// # Errors
    ///
    /// - [`SummarizerError::Http`] on network failure, timeout, or non-2xx status.
    /// - [`SummarizerError::Deserialize`] if the body is not a chat completion.
    /// - [`SummarizerError::EmptyCompletion`] if there is no first choice content.
    pub async fn describe(&self, records: &[RestroomRecord]) -> Result<Vec<String>, SummarizerError> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage::user(build_prompt(records))],
            max_tokens: TOKENS_PER_RECORD
                .saturating_mul(u32::try_from(records.len()).unwrap_or(u32::MAX)),
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;
        let parsed: ChatResponse = serde_json::from_str(&body)?;

        let content = parsed
            .first_content()
            .ok_or_else(|| SummarizerError::EmptyCompletion("no choices in response".to_string()))?;
        let descriptions = parse_descriptions(content);

        tracing::debug!(
            model = %self.model,
            requested = records.len(),
            received = descriptions.len(),
            "generated restroom descriptions"
        );
        Ok(descriptions)
    }
}

impl DescriptionGenerator for ChatSummarizer {
    type Error = SummarizerError;

    async fn generate_descriptions(
        &self,
        records: &[RestroomRecord],
    ) -> Result<Vec<String>, Self::Error> {
        self.describe(records).await
    }
}
