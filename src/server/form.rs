//! Multipart form decoding

use crate::domain::{Submission, Upload};
use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use thiserror::Error;

pub const FILE_FIELD: &str = "file";
pub const TEXT_FIELD: &str = "user-input";

#[derive(Error, Debug)]
pub enum FormError {
    #[error("File too large: the request exceeds the {limit} byte limit")]
    TooLarge { limit: u64 },

    #[error("Malformed form submission: {0}")]
    Malformed(String),
}

impl FormError {
    fn from_multipart(err: MultipartError, limit: u64) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            FormError::TooLarge { limit }
        } else {
            FormError::Malformed(err.body_text())
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            FormError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            FormError::Malformed(_) => StatusCode::BAD_REQUEST,
        }
    }
}

/// Collect the `file` and `user-input` parts; anything else is ignored.
///
/// A file part without bytes and without a filename is what browsers send
/// when nothing was picked, so it is treated as absent.
pub async fn read_submission(mut multipart: Multipart, limit: u64) -> Result<Submission, FormError> {
    let mut submission = Submission::default();

    while let Some(field) =
        multipart.next_field().await.map_err(|e| FormError::from_multipart(e, limit))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some(FILE_FIELD) => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(|e| FormError::from_multipart(e, limit))?;
                if !filename.is_empty() || !bytes.is_empty() {
                    submission.file = Some(Upload { filename, bytes: bytes.to_vec() });
                }
            }
            Some(TEXT_FIELD) => {
                let text = field.text().await.map_err(|e| FormError::from_multipart(e, limit))?;
                submission.text = Some(text);
            }
            _ => {}
        }
    }

    Ok(submission)
}
