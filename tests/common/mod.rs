//! Shared fakes for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use refactor_review::analysis::{ChatBackend, ChatRequest, TextStream};
use refactor_review::error::AnalysisError;
use std::sync::Mutex;

/// Replays a fixed reply and records every request it receives.
pub struct ScriptedBackend {
    reply: Vec<Result<String, AnalysisError>>,
    pub requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedBackend {
    pub fn new(reply: Vec<Result<&str, AnalysisError>>) -> Self {
        Self {
            reply: reply.into_iter().map(|item| item.map(str::to_string)).collect(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn ok(parts: &[&str]) -> Self {
        Self::new(parts.iter().map(|p| Ok(*p)).collect())
    }

    pub fn prompts(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.messages[0].content.clone())
            .collect()
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn stream_chat(&self, request: ChatRequest) -> Result<TextStream, AnalysisError> {
        self.requests.lock().unwrap().push(request);
        Ok(stream::iter(self.reply.clone()).boxed())
    }
}

/// Fails before any output, like an unreachable host.
pub struct RefusingBackend;

#[async_trait]
impl ChatBackend for RefusingBackend {
    async fn stream_chat(&self, _request: ChatRequest) -> Result<TextStream, AnalysisError> {
        Err(AnalysisError::Status { status: 401, message: "unauthorized".to_string() })
    }
}

pub fn ndjson(parts: &[&str]) -> String {
    let mut body = String::new();
    for part in parts {
        body.push_str(
            &serde_json::json!({"message": {"role": "assistant", "content": part}, "done": false})
                .to_string(),
        );
        body.push('\n');
    }
    body.push_str(&serde_json::json!({"message": {"content": ""}, "done": true}).to_string());
    body.push('\n');
    body
}
