//! Streaming refactor analysis against an external chat service

pub mod client;
pub mod ollama;
pub mod prompt;
pub mod streamer;

pub use client::{ChatBackend, ChatMessage, ChatRequest, TextStream};
pub use ollama::OllamaClient;
pub use prompt::build_prompt;
pub use streamer::{AnalysisStreamer, ChunkStream};
