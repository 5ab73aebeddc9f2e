//! LLM module: chat types, HTTP client, payload adapter, and tool orchestrator
//!
//! This module provides:
//! - `ChatBackend`, the seam between the orchestration code and the remote model
//! - `LlmClientConfig`, `LlmClient` for talking to OpenAI-compatible backends
//! - `chat_request_body` / `parse_chat_completion` for the Chat Completions wire format
//! - `ToolOrchestrator` for model-driven skill invocation

mod adapter;
pub(crate) mod backend;
mod client;
mod tool_orchestrator;
mod types;

pub use adapter::{chat_request_body, message_to_json, parse_chat_completion, parse_tool_calls_from_chat};
pub use backend::ChatBackend;
pub use client::{LlmClient, LlmClientConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use tool_orchestrator::{FinalAnswer, OrchestratorOptions, ToolOrchestrator, ToolOrchestratorStats};
pub use types::{
    ChatCompletion, ChatHistory, ChatMessage, ChatRequest, ChatRole, GenerationParams, ToolCall,
    ToolChoice, ToolDefinition,
};
