//! AnalysisStreamer: one review request, reply exposed as ordered chunks

use crate::analysis::client::{ChatBackend, ChatMessage, ChatRequest, TextStream};
use crate::analysis::ollama::OllamaClient;
use crate::analysis::prompt::build_prompt;
use crate::config::ServiceSettings;
use crate::domain::{AnalysisChunk, SanitizedInput};
use crate::error::AnalysisError;
use futures::stream::{self, BoxStream, StreamExt};
use std::sync::Arc;
use tracing::{info, warn};

/// Numbered chunks in receipt order. An `Err` item is always the last one.
pub type ChunkStream = BoxStream<'static, Result<AnalysisChunk, AnalysisError>>;

/// Owns the (read-only) backend and model choice; cheap to clone per request.
#[derive(Clone)]
pub struct AnalysisStreamer {
    backend: Arc<dyn ChatBackend>,
    model: String,
}

impl AnalysisStreamer {
    pub fn new(backend: Arc<dyn ChatBackend>, model: impl Into<String>) -> Self {
        Self { backend, model: model.into() }
    }

    /// Build against the configured Ollama service. Fails fast without a credential.
    pub fn from_settings(settings: &ServiceSettings) -> Result<Self, AnalysisError> {
        let client = OllamaClient::from_settings(settings)?;
        Ok(Self::new(Arc::new(client), settings.model.clone()))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn request_for(&self, input: &SanitizedInput) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::user(build_prompt(input.as_str()))],
            stream: true,
        }
    }

    /// Start the analysis. A single attempt is made; there are no retries.
    ///
    /// Waits for the first reply item. `Err` here means no chunk was received,
    /// whether the request was refused or the reply failed before its first
    /// fragment. Once the stream is returned, a later failure shows up as its
    /// final item and earlier chunks stay valid. Dropping the stream releases
    /// the underlying connection.
    pub async fn analyze(&self, input: &SanitizedInput) -> Result<ChunkStream, AnalysisError> {
        info!(model = %self.model, bytes = input.len(), "starting analysis");
        let mut texts = self.backend.stream_chat(self.request_for(input)).await.map_err(|e| {
            warn!(error = %e, "analysis request failed before streaming");
            e
        })?;
        let first = match texts.next().await {
            Some(Err(e)) => {
                warn!(error = %e, "analysis failed before the first chunk");
                return Err(e);
            }
            first => first,
        };
        Ok(number_chunks(stream::iter(first).chain(texts).boxed()))
    }
}

fn number_chunks(texts: TextStream) -> ChunkStream {
    stream::unfold((texts, 0usize, false), |(mut texts, index, stopped)| async move {
        if stopped {
            return None;
        }
        match texts.next().await? {
            Ok(text) => Some((Ok(AnalysisChunk { index, text }), (texts, index + 1, false))),
            Err(e) => {
                warn!(after_chunks = index, error = %e, "analysis stream ended with an error");
                Some((Err(e), (texts, index, true)))
            }
        }
    })
    .boxed()
}
