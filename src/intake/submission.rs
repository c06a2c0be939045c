//! Turning a form submission into a [`SourceDocument`]

use crate::domain::{SourceDocument, Submission, Upload};
use crate::error::{PipelineError, ValidationError};
use crate::intake::validator::{check_payload_size, is_allowed, materialize};
use crate::scan::FileExtensionPolicy;
use tracing::info;

/// Validate a submission and build the document to analyze.
///
/// A file part with an empty filename and blank pasted text both count as
/// absent. When both sources are present the upload's extension is still
/// checked, then the pasted text wins.
pub fn accept_submission(
    submission: Submission,
    policy: &FileExtensionPolicy,
    max_payload_bytes: u64,
) -> Result<SourceDocument, PipelineError> {
    let file = submission.file.filter(|f| !f.filename.is_empty());
    let text = submission.text.filter(|t| !t.trim().is_empty());

    if file.is_none() && text.is_none() {
        return Err(ValidationError::NoInput.into());
    }

    if let Some(upload) = &file {
        validate_upload(upload, policy, max_payload_bytes)?;
    }

    if let Some(text) = text {
        check_payload_size(text.len() as u64, max_payload_bytes)?;
        info!(bytes = text.len(), "accepted pasted input");
        return Ok(SourceDocument::pasted(text));
    }

    match file {
        Some(upload) => {
            let content = materialize(&upload)?;
            info!(filename = %upload.filename, bytes = content.len(), "accepted upload");
            Ok(SourceDocument::uploaded(content, upload.filename))
        }
        None => Err(ValidationError::NoInput.into()),
    }
}

fn validate_upload(
    upload: &Upload,
    policy: &FileExtensionPolicy,
    max_payload_bytes: u64,
) -> Result<(), ValidationError> {
    if !is_allowed(&upload.filename, policy) {
        return Err(ValidationError::DisallowedExtension {
            filename: upload.filename.clone(),
            allowed: policy.describe(),
        });
    }
    check_payload_size(upload.bytes.len() as u64, max_payload_bytes)
}
