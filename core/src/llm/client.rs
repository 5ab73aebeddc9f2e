use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error};

use super::adapter::{chat_request_body, parse_chat_completion};
use super::backend::ChatBackend;
use super::types::{ChatCompletion, ChatRequest};
use crate::{LoomError, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Configuration for LlmClient loaded from environment variables
#[derive(Debug, Clone, PartialEq)]
pub struct LlmClientConfig {
    pub base_url: String, // e.g., https://api.openai.com/v1
    pub model: String,    // e.g., gpt-4o
    pub api_key: String,
    pub request_timeout_ms: u64,
    /// Used when a request does not set its own temperature
    pub temperature: Option<f32>,
}

impl LlmClientConfig {
    /// Read the client settings from the process environment.
    ///
    /// `OPENAI_API_KEY` is mandatory; everything else has a default.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                LoomError::Config("OPENAI_API_KEY environment variable is not set.".into())
            })?;
        Ok(Self {
            base_url: std::env::var("OPENAI_BASE_URL")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: std::env::var("OPENAI_MODEL")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_key,
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(60_000),
            temperature: std::env::var("OPENAI_TEMPERATURE")
                .ok()
                .and_then(|v| v.parse::<f32>().ok()),
        })
    }
}

/// HTTP client for OpenAI-compatible Chat Completions endpoints
#[derive(Clone)]
pub struct LlmClient {
    http: Client,
    cfg: LlmClientConfig,
}

impl LlmClient {
    pub fn new(cfg: LlmClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_millis(cfg.request_timeout_ms))
            .build()
            .map_err(|e| LoomError::Llm(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { http, cfg })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(LlmClientConfig::from_env()?)
    }

    pub fn config(&self) -> &LlmClientConfig {
        &self.cfg
    }

    fn chat_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.cfg.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl ChatBackend for LlmClient {
    /// Contract:
    /// - Input: ChatRequest (history, params, optional tools)
    /// - Output: ChatCompletion with text and/or tool calls
    /// - Error: network, non-2xx status, or unparseable body; no retries
    async fn complete(&self, request: ChatRequest) -> Result<ChatCompletion> {
        let url = self.chat_url();
        debug!(
            target: "llm_client",
            messages = request.messages.len(),
            tools = request.tools.len(),
            "POST {} via Chat Completions",
            url
        );

        let body = chat_request_body(&self.cfg.model, self.cfg.temperature, &request);
        let resp = self
            .http
            .post(&url)
            .header("content-type", "application/json")
            .bearer_auth(&self.cfg.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LoomError::Llm(format!("Chat Completions HTTP error: {e}")))?;
        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            error!(target: "llm_client", %status, body = %text, "Chat Completions error");
            return Err(LoomError::Llm(format!(
                "Chat Completions error: status={} body={}",
                status, text
            )));
        }

        let val: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| LoomError::Llm(format!("Failed to parse Chat Completions JSON: {e}")))?;
        parse_chat_completion(&val)
    }
}
