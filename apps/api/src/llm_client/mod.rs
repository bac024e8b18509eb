/// LLM Client: the single point of entry for all model calls in Folio.
///
/// ARCHITECTURAL RULE: No other module may call the Anthropic API directly.
/// All LLM interactions MUST go through this module.
///
/// Model: claude-sonnet-4-5 (hardcoded, not configurable)
///
/// Requests are single-attempt with no client timeout: a slow call simply
/// keeps its HTTP request open until the API answers.
use std::sync::Arc;

use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::storage::KvStore;

pub mod prompts;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The model used for all LLM calls in Folio.
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 4096;

/// Storage key of the user-supplied credential. Takes precedence over the
/// environment key.
pub const API_KEY_STORAGE_KEY: &str = "api_key";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,

    /// No stored key and no environment key. Raised before any network I/O.
    #[error("No API key configured")]
    CredentialsMissing,

    #[error("Credential storage error: {0}")]
    Credentials(anyhow::Error),
}

/// One block of a user message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    Image { source: Base64Source },
    Document { source: Base64Source },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Base64Source {
    #[serde(rename = "type")]
    pub source_type: &'static str,
    pub media_type: String,
    pub data: String,
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text { text: text.into() }
    }

    pub fn image(media_type: impl Into<String>, data: impl Into<String>) -> Self {
        ContentPart::Image {
            source: Base64Source::new(media_type, data),
        }
    }

    pub fn pdf(data: impl Into<String>) -> Self {
        ContentPart::Document {
            source: Base64Source::new("application/pdf", data),
        }
    }
}

impl Base64Source {
    fn new(media_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            source_type: "base64",
            media_type: media_type.into(),
            data: data.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a [ContentPart],
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Extracts the text content from the first text block.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// The single LLM client used by all assistant operations.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_url: String,
    fallback_api_key: Option<String>,
    credentials: Arc<dyn KvStore>,
}

impl LlmClient {
    /// `fallback_api_key` is the environment key; `credentials` holds the
    /// user-supplied one.
    pub fn new(fallback_api_key: Option<String>, credentials: Arc<dyn KvStore>) -> Self {
        Self {
            client: Client::new(),
            api_url: ANTHROPIC_API_URL.to_string(),
            fallback_api_key: fallback_api_key.filter(|k| !k.trim().is_empty()),
            credentials,
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    // ── Credentials ─────────────────────────────────────────────────────────

    /// Stored key first, then the environment key.
    pub async fn api_key(&self) -> Result<Option<String>, LlmError> {
        let stored = self
            .credentials
            .get(API_KEY_STORAGE_KEY)
            .await
            .map_err(LlmError::Credentials)?
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        Ok(stored.or_else(|| self.fallback_api_key.clone()))
    }

    pub async fn has_api_key(&self) -> Result<bool, LlmError> {
        Ok(self.api_key().await?.is_some())
    }

    pub async fn has_stored_api_key(&self) -> Result<bool, LlmError> {
        Ok(self
            .credentials
            .get(API_KEY_STORAGE_KEY)
            .await
            .map_err(LlmError::Credentials)?
            .is_some_and(|k| !k.trim().is_empty()))
    }

    pub async fn store_api_key(&self, key: &str) -> Result<(), LlmError> {
        self.credentials
            .set(API_KEY_STORAGE_KEY, key.trim())
            .await
            .map_err(LlmError::Credentials)?;
        info!("Stored user API key");
        Ok(())
    }

    pub async fn clear_api_key(&self) -> Result<(), LlmError> {
        self.credentials
            .delete(API_KEY_STORAGE_KEY)
            .await
            .map_err(LlmError::Credentials)?;
        info!("Cleared user API key");
        Ok(())
    }

    // ── Calls ───────────────────────────────────────────────────────────────

    /// Makes a raw call to the Messages API, returning the full response object.
    pub async fn call(&self, parts: &[ContentPart], system: &str) -> Result<LlmResponse, LlmError> {
        let api_key = self.api_key().await?.ok_or(LlmError::CredentialsMissing)?;

        let request_body = AnthropicRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            system,
            messages: vec![AnthropicMessage {
                role: "user",
                content: parts,
            }],
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<AnthropicError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            warn!("LLM API returned {}: {}", status, message);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let llm_response: LlmResponse = response.json().await?;

        if let Some(usage) = &llm_response.usage {
            debug!(
                "LLM call succeeded: input_tokens={}, output_tokens={}",
                usage.input_tokens, usage.output_tokens
            );
        }

        Ok(llm_response)
    }

    /// Calls the LLM and returns the trimmed text of the first text block.
    pub async fn call_text(&self, parts: &[ContentPart], system: &str) -> Result<String, LlmError> {
        let response = self.call(parts, system).await?;
        let text = response.text().map(str::trim).unwrap_or_default();
        if text.is_empty() {
            return Err(LlmError::EmptyContent);
        }
        Ok(text.to_string())
    }

    /// Convenience method that calls the LLM and deserializes the text response as JSON.
    /// The prompt must instruct the model to return valid JSON.
    ///
    /// `null` members are dropped before deserializing so that field defaults apply.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        parts: &[ContentPart],
        system: &str,
    ) -> Result<T, LlmError> {
        let text = self.call_text(parts, system).await?;
        parse_json_reply(&text)
    }
}

/// Parses a model reply as JSON after removing code fences and `null` members.
pub fn parse_json_reply<T: DeserializeOwned>(text: &str) -> Result<T, LlmError> {
    let mut value: Value = serde_json::from_str(strip_json_fences(text))?;
    strip_nulls(&mut value);
    serde_json::from_value(value).map_err(LlmError::Parse)
}

fn strip_nulls(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            map.values_mut().for_each(strip_nulls);
        }
        Value::Array(items) => {
            items.retain(|v| !v.is_null());
            items.iter_mut().for_each(strip_nulls);
        }
        _ => {}
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(stripped) = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
    else {
        return text;
    };
    let stripped = stripped.trim_start();
    stripped
        .strip_suffix("```")
        .map(str::trim)
        .unwrap_or(stripped)
}
