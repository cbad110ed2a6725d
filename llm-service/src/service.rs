//! OpenAI-style completion service.
//!
//! Minimal, non-streaming client around `POST {endpoint}/v1/chat/completions`.
//! The review pipeline only depends on the `complete(system, user) -> text`
//! contract and its failure mode; it never retries a completion failure.
//!
//! Constructor validation:
//! - `cfg.api_key` must be present
//! - `cfg.endpoint` must start with http:// or https://
//! - `cfg.model` must be non-empty

use std::time::{Duration, Instant};

use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::config::LlmModelConfig;
use crate::errors::{CompletionError, Result, make_snippet};

/// Thin client for an OpenAI-compatible chat completions API.
///
/// Constructed from a complete [`LlmModelConfig`]. Internally keeps a
/// preconfigured `reqwest::Client` with timeout and default headers.
#[derive(Debug)]
pub struct CompletionService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_chat: String,
}

impl CompletionService {
    /// Creates a new [`CompletionService`] from the given config.
    ///
    /// # Errors
    /// - [`CompletionError::MissingApiKey`] if `cfg.api_key` is `None`
    /// - [`CompletionError::InvalidEndpoint`] if `cfg.endpoint` is invalid
    /// - [`CompletionError::EmptyModel`] if `cfg.model` is empty
    /// - [`CompletionError::Transport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self> {
        let api_key = cfg
            .api_key
            .clone()
            .ok_or(CompletionError::MissingApiKey)?;

        let endpoint = cfg.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(CompletionError::InvalidEndpoint(cfg.endpoint.clone()));
        }

        if cfg.model.trim().is_empty() {
            return Err(CompletionError::EmptyModel);
        }

        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(60));

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|e| CompletionError::Decode(format!("invalid API key header: {e}")))?,
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        let base = endpoint.trim_end_matches('/').to_string();
        let url_chat = format!("{}/v1/chat/completions", base);

        info!(
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            timeout_secs = cfg.timeout_secs.unwrap_or(60),
            "CompletionService initialized"
        );

        Ok(Self {
            client,
            cfg,
            url_chat,
        })
    }

    /// Performs a **non-streaming** chat completion with a system and a user
    /// message, returning the generated text.
    ///
    /// # Errors
    /// - [`CompletionError::HttpStatus`] for non-2xx responses
    /// - [`CompletionError::Transport`] for client/network failures
    /// - [`CompletionError::Decode`] if the JSON cannot be parsed
    /// - [`CompletionError::EmptyChoices`] if no choices are returned
    pub async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let started = Instant::now();
        let body = ChatCompletionRequest::from_cfg(&self.cfg, system, user);

        debug!(
            model = %self.cfg.model,
            system_len = system.len(),
            user_len = user.len(),
            "POST {}", self.url_chat
        );

        let resp = self.client.post(&self.url_chat).json(&body).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_chat.clone();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            error!(
                %status,
                %url,
                %snippet,
                model = %self.cfg.model,
                latency_ms = started.elapsed().as_millis(),
                "chat completion returned non-success status"
            );

            return Err(CompletionError::HttpStatus {
                status,
                url,
                snippet,
            });
        }

        let out: ChatCompletionResponse = resp.json().await.map_err(|e| {
            CompletionError::Decode(format!(
                "serde error: {e}; expected `choices[0].message.content`"
            ))
        })?;

        let content = out
            .choices
            .into_iter()
            .find_map(|c| c.message.content)
            .ok_or(CompletionError::EmptyChoices)?;

        info!(
            model = %self.cfg.model,
            latency_ms = started.elapsed().as_millis(),
            "chat completion completed"
        );

        Ok(content)
    }
}

/* ===========================================================================
HTTP payloads
======================================================================== */

/// Minimal request body for `/v1/chat/completions` (non-streaming).
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

impl<'a> ChatCompletionRequest<'a> {
    /// Builds a two-message chat request from config and prompt parts.
    fn from_cfg(cfg: &'a LlmModelConfig, system: &'a str, user: &'a str) -> Self {
        let messages = vec![
            ChatMessage {
                role: "system",
                content: system,
            },
            ChatMessage {
                role: "user",
                content: user,
            },
        ];

        Self {
            model: &cfg.model,
            messages,
            temperature: cfg.temperature,
            top_p: cfg.top_p,
            max_tokens: cfg.max_tokens,
        }
    }
}

/// Chat message for the API.
#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Minimal response for `/v1/chat/completions`.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
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
