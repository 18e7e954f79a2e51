//! Gemini provider (Generative Language API, non-streaming).

use std::fmt;

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::{Value, json};

use crate::config::Config;
use crate::session::ChatMessage;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Standard User-Agent header for verso API requests.
pub const USER_AGENT: &str = concat!("verso/", env!("CARGO_PKG_VERSION"));

/// Categories of provider errors for consistent error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// HTTP status error (4xx, 5xx)
    HttpStatus,
    /// Connection timeout or request timeout
    Timeout,
    /// Failed to parse the response body
    Parse,
    /// API-level error returned by the provider
    ApiError,
}

impl fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderErrorKind::HttpStatus => write!(f, "http_status"),
            ProviderErrorKind::Timeout => write!(f, "timeout"),
            ProviderErrorKind::Parse => write!(f, "parse"),
            ProviderErrorKind::ApiError => write!(f, "api_error"),
        }
    }
}

/// Structured error from the provider with kind and details.
#[derive(Debug, Clone)]
pub struct ProviderError {
    /// Error category
    pub kind: ProviderErrorKind,
    /// One-line summary suitable for display
    pub message: String,
    /// Optional additional details (e.g. raw error body)
    pub details: Option<String>,
}

impl ProviderError {
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
        }
    }

    /// Creates an HTTP status error, mining the body for `error.message`.
    pub fn http_status(status: u16, body: &str) -> Self {
        if let Ok(value) = serde_json::from_str::<Value>(body)
            && let Some(message) = value
                .get("error")
                .and_then(|error| error.get("message"))
                .and_then(Value::as_str)
        {
            return Self {
                kind: ProviderErrorKind::HttpStatus,
                message: format!("HTTP {status}: {message}"),
                details: Some(body.to_string()),
            };
        }

        Self {
            kind: ProviderErrorKind::HttpStatus,
            message: format!("HTTP {status}"),
            details: (!body.is_empty()).then(|| body.to_string()),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Timeout, message)
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Parse, message)
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ProviderError {}

/// Result type for provider operations.
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// Classifies a reqwest error into a `ProviderError`.
pub fn classify_reqwest_error(e: &reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::timeout(format!("Request timed out: {e}"))
    } else if e.is_connect() {
        ProviderError::timeout(format!("Connection failed: {e}"))
    } else {
        ProviderError::new(ProviderErrorKind::HttpStatus, format!("Network error: {e}"))
    }
}

/// Resolves an API key with precedence: config > env.
///
/// The key is read lazily at client construction; an absent key fails here
/// rather than at first use.
///
/// # Errors
/// Returns an error when no key is configured in either place.
pub fn resolve_api_key(config_api_key: Option<&str>) -> Result<String> {
    if let Some(key) = config_api_key {
        let trimmed = key.trim();
        if !trimmed.is_empty() {
            return Ok(trimmed.to_string());
        }
    }

    // GEMINI_API_KEY is the primary name; GOOGLE_API_KEY is accepted for
    // compatibility with other Gemini tooling.
    for var in ["GEMINI_API_KEY", "GOOGLE_API_KEY"] {
        if let Ok(key) = std::env::var(var) {
            let trimmed = key.trim().to_string();
            if !trimmed.is_empty() {
                return Ok(trimmed);
            }
        }
    }

    anyhow::bail!("No API key available. Set GEMINI_API_KEY or api_key in [providers.gemini].")
}

/// Resolves the base URL with precedence: env > config > default.
///
/// # Errors
/// Returns an error when the chosen URL is not well-formed.
pub fn resolve_base_url(config_base_url: Option<&str>) -> Result<String> {
    if let Ok(env_url) = std::env::var("GEMINI_BASE_URL") {
        let trimmed = env_url.trim();
        if !trimmed.is_empty() {
            validate_url(trimmed)?;
            return Ok(trimmed.to_string());
        }
    }

    if let Some(config_url) = config_base_url {
        let trimmed = config_url.trim();
        if !trimmed.is_empty() {
            validate_url(trimmed)?;
            return Ok(trimmed.to_string());
        }
    }

    Ok(DEFAULT_BASE_URL.to_string())
}

fn validate_url(url: &str) -> Result<()> {
    url::Url::parse(url).with_context(|| format!("Invalid Gemini base URL: {url}"))?;
    Ok(())
}

/// Gemini API configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: Option<u32>,
}

impl GeminiConfig {
    /// Resolves a provider config from the loaded app config and environment.
    ///
    /// # Errors
    /// Returns an error when no API key is available or the base URL is
    /// malformed.
    pub fn from_config(config: &Config) -> Result<Self> {
        let gemini = &config.providers.gemini;
        Ok(Self {
            api_key: resolve_api_key(gemini.api_key.as_deref())?,
            base_url: resolve_base_url(gemini.base_url.as_deref())?,
            model: config.model.clone(),
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        })
    }
}

/// Gemini client.
pub struct GeminiClient {
    config: GeminiConfig,
    http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Sends the transcript plus one new prompt and returns the response text.
    ///
    /// Blocking from the caller's point of view: the future resolves with the
    /// complete response (no streaming).
    ///
    /// # Errors
    /// Returns a classified `ProviderError` on network, HTTP, or parse
    /// failures.
    pub async fn generate(&self, transcript: &[ChatMessage], prompt: &str) -> ProviderResult<String> {
        let request = build_request(
            transcript,
            prompt,
            self.config.temperature,
            self.config.max_output_tokens,
        );
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        );

        tracing::debug!(model = %self.config.model, turns = transcript.len() / 2, "sending generateContent request");

        let response = self
            .http
            .post(&url)
            .headers(build_headers(&self.config.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "generateContent failed");
            return Err(ProviderError::http_status(status.as_u16(), &body));
        }

        let value: Value = serde_json::from_str(&body)
            .map_err(|e| ProviderError::parse(format!("Invalid response JSON: {e}")))?;
        parse_response(&value)
    }
}

/// Builds the generateContent request body: the running transcript followed
/// by the new prompt, with a fixed sampling temperature.
fn build_request(
    transcript: &[ChatMessage],
    prompt: &str,
    temperature: f32,
    max_output_tokens: Option<u32>,
) -> Value {
    let mut contents: Vec<Value> = transcript
        .iter()
        .map(|message| {
            json!({
                "role": message.role.as_str(),
                "parts": [{ "text": message.text }]
            })
        })
        .collect();
    contents.push(json!({
        "role": "user",
        "parts": [{ "text": prompt }]
    }));

    let mut generation_config = json!({ "temperature": temperature });
    if let Some(max) = max_output_tokens {
        generation_config["maxOutputTokens"] = json!(max);
    }

    json!({
        "contents": contents,
        "generationConfig": generation_config,
    })
}

/// Extracts the first candidate's text parts, concatenated.
fn parse_response(value: &Value) -> ProviderResult<String> {
    if let Some(error) = value.get("error") {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown provider error");
        return Err(ProviderError::new(ProviderErrorKind::ApiError, message));
    }

    let parts = value
        .get("candidates")
        .and_then(Value::as_array)
        .and_then(|candidates| candidates.first())
        .and_then(|candidate| candidate.get("content"))
        .and_then(|content| content.get("parts"))
        .and_then(Value::as_array)
        .ok_or_else(|| ProviderError::parse("Response has no candidates[0].content.parts"))?;

    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();

    if text.is_empty() {
        return Err(ProviderError::parse("Response contains no text parts"));
    }
    Ok(text)
}

fn build_headers(api_key: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        "x-goog-api-key",
        HeaderValue::from_str(api_key).unwrap_or_else(|_| HeaderValue::from_static("")),
    );
    headers.insert("accept", HeaderValue::from_static("application/json"));
    headers.insert("content-type", HeaderValue::from_static("application/json"));
    headers.insert("user-agent", HeaderValue::from_static(USER_AGENT));
    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::ChatMessage;

    #[test]
    fn build_request_appends_prompt_after_transcript() {
        let transcript = vec![
            ChatMessage::user("earlier prompt"),
            ChatMessage::model("earlier response"),
        ];
        let request = build_request(&transcript, "new prompt", 0.5, None);

        let contents = request["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[2]["role"], "user");
        assert_eq!(contents[2]["parts"][0]["text"], "new prompt");
        assert_eq!(request["generationConfig"]["temperature"], 0.5);
        assert!(request["generationConfig"].get("maxOutputTokens").is_none());
    }

    #[test]
    fn build_request_sets_max_output_tokens_when_present() {
        let request = build_request(&[], "p", 0.5, Some(2048));
        assert_eq!(request["generationConfig"]["maxOutputTokens"], 2048);
    }

    #[test]
    fn parse_response_concatenates_text_parts() {
        let value = json!({
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "```python\n" },
                        { "text": "print('hi')\n```" }
                    ]
                }
            }]
        });

        let text = parse_response(&value).unwrap();
        assert_eq!(text, "```python\nprint('hi')\n```");
    }

    #[test]
    fn parse_response_reports_api_error() {
        let value = json!({
            "error": { "code": 429, "message": "Resource exhausted" }
        });

        let err = parse_response(&value).unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::ApiError);
        assert!(err.message.contains("Resource exhausted"));
    }

    #[test]
    fn parse_response_without_candidates_is_a_parse_error() {
        let err = parse_response(&json!({})).unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::Parse);
    }

    #[test]
    fn http_status_error_mines_error_message() {
        let body = r#"{"error":{"code":401,"message":"API key not valid"}}"#;
        let err = ProviderError::http_status(401, body);
        assert_eq!(err.kind, ProviderErrorKind::HttpStatus);
        assert!(err.message.contains("API key not valid"));
        assert!(err.details.is_some());
    }

    #[test]
    fn http_status_error_without_json_body() {
        let err = ProviderError::http_status(500, "");
        assert_eq!(err.message, "HTTP 500");
        assert!(err.details.is_none());
    }

    #[test]
    fn resolve_api_key_prefers_config_value() {
        let key = resolve_api_key(Some("  config-key  ")).unwrap();
        assert_eq!(key, "config-key");
    }

    #[test]
    fn resolve_base_url_rejects_malformed_config_url() {
        assert!(resolve_base_url(Some("not a url")).is_err());
    }
}
