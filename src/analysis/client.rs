//! Chat service seam

use crate::error::AnalysisError;
use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::Serialize;

/// Raw text fragments in receipt order. After an `Err` item the stream ends.
pub type TextStream = BoxStream<'static, Result<String, AnalysisError>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
}

/// A text-generation service that can stream a reply.
///
/// `stream_chat` fails only when the call cannot be started (auth, network,
/// non-success status). Failures after that arrive as the stream's last item.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn stream_chat(&self, request: ChatRequest) -> Result<TextStream, AnalysisError>;
}
