//! Stub chat backends shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use loom_skills::llm::{ChatBackend, ChatCompletion, ChatRequest, ToolCall};
use loom_skills::{LoomError, Result};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

// =============================================================================
// Scripted backend: replays canned replies in order, records every request
// =============================================================================

pub struct ScriptedBackend {
    replies: Mutex<VecDeque<Result<ChatCompletion>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedBackend {
    pub fn new(replies: Vec<Result<ChatCompletion>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn complete(&self, request: ChatRequest) -> Result<ChatCompletion> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LoomError::Llm("script exhausted".into())))
    }
}

// =============================================================================
// Closure backend: computes each reply from the request
// =============================================================================

type ReplyFn = dyn Fn(&ChatRequest) -> Result<ChatCompletion> + Send + Sync;

pub struct FnBackend {
    reply: Box<ReplyFn>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl FnBackend {
    pub fn new<F>(reply: F) -> Self
    where
        F: Fn(&ChatRequest) -> Result<ChatCompletion> + Send + Sync + 'static,
    {
        Self {
            reply: Box::new(reply),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always answers with the same text
    pub fn fixed(text: &str) -> Self {
        let text = text.to_string();
        Self::new(move |_| Ok(ChatCompletion::from_text(text.clone())))
    }

    pub fn failing(message: &str) -> Self {
        let message = message.to_string();
        Self::new(move |_| Err(LoomError::Llm(message.clone())))
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatBackend for FnBackend {
    async fn complete(&self, request: ChatRequest) -> Result<ChatCompletion> {
        let reply = (self.reply)(&request);
        self.requests.lock().unwrap().push(request);
        reply
    }
}

pub fn tool_call(id: &str, name: &str, arguments: Value) -> ChatCompletion {
    ChatCompletion::from_tool_calls(vec![ToolCall {
        id: Some(id.to_string()),
        name: name.to_string(),
        arguments,
    }])
}
