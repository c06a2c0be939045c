//! Error taxonomy for the intake → analysis → render pipeline.
//!
//! Every variant carries enough context to build the message shown to the user;
//! nothing in here should ever take the serving process down.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Uploaded file is not valid UTF-8 text: {0}")]
    Decode(#[from] std::string::FromUtf8Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Error calling analysis service: {0}")]
    AnalysisService(#[from] AnalysisError),

    #[error("Failed to render report: {0}")]
    Render(#[from] RenderError),
}

impl PipelineError {
    /// Text shown inline by the presentation layer.
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// Validation failures send the user back to the form; everything else is
    /// shown in place of the report.
    pub fn is_validation(&self) -> bool {
        matches!(self, PipelineError::Validation(_))
    }
}

/// Problems with what the user submitted. Never reaches the analysis service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("No data, please upload a file or paste your code")]
    NoInput,

    #[error("File type not allowed. Please upload {allowed} files.")]
    DisallowedExtension { filename: String, allowed: String },

    #[error("File too large: {size} bytes exceeds the {limit} byte limit")]
    TooLarge { size: u64, limit: u64 },

    #[error("Extension policy must contain at least one extension")]
    EmptyExtensionPolicy,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("no API key configured (set OLLAMA_API_KEY or service.api_key)")]
    MissingCredential,

    #[error("invalid service host '{0}'")]
    InvalidHost(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("service returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("malformed stream line: {0}")]
    Protocol(String),

    #[error("{0}")]
    Service(String),

    #[error("stream ended before completion after {received} chunks")]
    Truncated { received: usize },
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("HTML formatting failed: {0}")]
    Format(#[from] std::io::Error),

    #[error("renderer produced invalid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_are_user_facing() {
        let err = PipelineError::from(ValidationError::NoInput);
        assert!(err.is_validation());
        assert_eq!(err.user_message(), "No data, please upload a file or paste your code");

        let err = PipelineError::from(ValidationError::DisallowedExtension {
            filename: "notes.md".to_string(),
            allowed: ".ts, .js".to_string(),
        });
        assert_eq!(err.user_message(), "File type not allowed. Please upload .ts, .js files.");
    }

    #[test]
    fn analysis_errors_carry_cause_text() {
        let err = PipelineError::from(AnalysisError::Status {
            status: 401,
            message: "unauthorized".to_string(),
        });
        assert!(!err.is_validation());
        assert_eq!(
            err.user_message(),
            "Error calling analysis service: service returned 401: unauthorized"
        );
    }
}
