//! Ollama-compatible `/api/chat` client
//!
//! The reply is newline-delimited JSON. Each line carries
//! `{"message": {"content": "..."}, "done": false}`, the last one has
//! `"done": true`, and a line with an `"error"` key reports a failure.

use crate::analysis::client::{ChatBackend, ChatRequest, TextStream};
use crate::config::ServiceSettings;
use crate::error::AnalysisError;
use async_trait::async_trait;
use futures::stream::{self, Stream, StreamExt};
use serde::Deserialize;
use std::fmt;
use std::pin::Pin;
use std::time::Duration;
use tracing::debug;

const CHAT_PATH: &str = "/api/chat";
const MAX_PROTOCOL_EXCERPT: usize = 120;

/// HTTP client for the chat endpoint. Built once at startup and shared read-only.
#[derive(Clone)]
pub struct OllamaClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl fmt::Debug for OllamaClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OllamaClient").field("endpoint", &self.endpoint).finish_non_exhaustive()
    }
}

impl OllamaClient {
    /// Fails with [`AnalysisError::MissingCredential`] when no API key is configured.
    pub fn from_settings(settings: &ServiceSettings) -> Result<Self, AnalysisError> {
        let api_key = settings
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(AnalysisError::MissingCredential)?
            .to_string();

        let endpoint = chat_endpoint(&settings.host)?;
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
            .build()
            .map_err(|e| AnalysisError::Request(e.to_string()))?;

        Ok(Self { http, endpoint, api_key })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ChatBackend for OllamaClient {
    async fn stream_chat(&self, request: ChatRequest) -> Result<TextStream, AnalysisError> {
        debug!(endpoint = %self.endpoint, model = %request.model, "POST chat request");
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AnalysisError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Status {
                status: status.as_u16(),
                message: error_message(&body, status.canonical_reason()),
            });
        }

        Ok(decode_ndjson(response.bytes_stream()))
    }
}

/// `{host}/api/chat`; a bare `host:port` (as `OLLAMA_HOST` is often set) gets `http://`.
fn chat_endpoint(host: &str) -> Result<String, AnalysisError> {
    let host = host.trim().trim_end_matches('/');
    if host.is_empty() {
        return Err(AnalysisError::InvalidHost(host.to_string()));
    }
    let base = if host.contains("://") { host.to_string() } else { format!("http://{}", host) };
    reqwest::Url::parse(&base).map_err(|_| AnalysisError::InvalidHost(host.to_string()))?;
    Ok(format!("{}{}", base, CHAT_PATH))
}

#[derive(Debug, Deserialize)]
struct StreamLine {
    #[serde(default)]
    message: Option<LineMessage>,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LineMessage {
    #[serde(default)]
    content: String,
}

/// Prefer the service's own `{"error": ...}` text over the raw body.
fn error_message(body: &str, reason: Option<&str>) -> String {
    if let Ok(StreamLine { error: Some(error), .. }) = serde_json::from_str::<StreamLine>(body) {
        return error;
    }
    let body = body.trim();
    if body.is_empty() {
        reason.unwrap_or("unknown error").to_string()
    } else {
        excerpt(body)
    }
}

fn excerpt(text: &str) -> String {
    match text.char_indices().nth(MAX_PROTOCOL_EXCERPT) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}

struct NdjsonDecoder<S> {
    bytes: Pin<Box<S>>,
    buffer: Vec<u8>,
    received: usize,
    done: bool,
    failed: bool,
}

impl<S, B, E> NdjsonDecoder<S>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: fmt::Display,
{
    async fn next_text(&mut self) -> Option<Result<String, AnalysisError>> {
        loop {
            if self.done || self.failed {
                return None;
            }

            if let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
                let line: Vec<u8> = self.buffer.drain(..=pos).collect();
                match self.parse_line(&line) {
                    Some(item) => return Some(item),
                    None => continue,
                }
            }

            match self.bytes.next().await {
                Some(Ok(chunk)) => self.buffer.extend_from_slice(chunk.as_ref()),
                Some(Err(e)) => {
                    self.failed = true;
                    return Some(Err(AnalysisError::Request(e.to_string())));
                }
                None => {
                    // A final line without a trailing newline is still a line.
                    if !self.buffer.is_empty() {
                        let line = std::mem::take(&mut self.buffer);
                        if let Some(item) = self.parse_line(&line) {
                            return Some(item);
                        }
                    }
                    if self.done {
                        return None;
                    }
                    self.failed = true;
                    return Some(Err(AnalysisError::Truncated { received: self.received }));
                }
            }
        }
    }

    /// `None` for lines that carry nothing (blank, empty content).
    fn parse_line(&mut self, raw: &[u8]) -> Option<Result<String, AnalysisError>> {
        let text = String::from_utf8_lossy(raw);
        let line = text.trim();
        if line.is_empty() {
            return None;
        }

        let parsed: StreamLine = match serde_json::from_str(line) {
            Ok(parsed) => parsed,
            Err(_) => {
                self.failed = true;
                return Some(Err(AnalysisError::Protocol(excerpt(line))));
            }
        };

        if let Some(error) = parsed.error {
            self.failed = true;
            return Some(Err(AnalysisError::Service(error)));
        }

        self.done = parsed.done;
        let content = parsed.message.map(|m| m.content).unwrap_or_default();
        if content.is_empty() {
            return None;
        }
        self.received += 1;
        Some(Ok(content))
    }
}

/// Turn a byte stream of NDJSON into text fragments.
///
/// Empty fragments are dropped. The stream ends after the `done` line, or with
/// one terminal error: a service `error` line, an unparseable line, a transport
/// failure, or [`AnalysisError::Truncated`] when the body ends before `done`.
pub fn decode_ndjson<S, B, E>(bytes: S) -> TextStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: fmt::Display + Send + 'static,
{
    let decoder = NdjsonDecoder {
        bytes: Box::pin(bytes),
        buffer: Vec::new(),
        received: 0,
        done: false,
        failed: false,
    };

    stream::unfold(decoder, |mut decoder| async move {
        let item = decoder.next_text().await?;
        Some((item, decoder))
    })
    .boxed()
}
