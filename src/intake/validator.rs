//! Upload validation and materialization

use crate::domain::Upload;
use crate::error::{PipelineError, ValidationError};
use crate::sanitize::secure_filename;
use crate::scan::FileExtensionPolicy;
use std::fs;
use std::path::Path;
use tracing::debug;

const TEMP_DIR_PREFIX: &str = "refactor-review-upload-";

/// Whether `filename` carries an allowed extension.
pub fn is_allowed(filename: &str, policy: &FileExtensionPolicy) -> bool {
    policy.matches(filename)
}

/// Reject payloads above the configured limit before anything is written.
pub fn check_payload_size(size: u64, limit: u64) -> Result<(), ValidationError> {
    if size > limit {
        return Err(ValidationError::TooLarge { size, limit });
    }
    Ok(())
}

/// Persist the upload to a private temporary directory under a sanitized name,
/// read it back and decode it as UTF-8.
///
/// The directory is removed when this function returns, on success and on
/// every error path.
pub fn materialize(upload: &Upload) -> Result<String, PipelineError> {
    materialize_in(upload, &std::env::temp_dir())
}

/// [`materialize`] with an explicit parent for the temporary directory.
pub fn materialize_in(upload: &Upload, parent: &Path) -> Result<String, PipelineError> {
    let temp_dir = tempfile::Builder::new().prefix(TEMP_DIR_PREFIX).tempdir_in(parent)?;
    let path = temp_dir.path().join(secure_filename(&upload.filename));
    debug!(path = %path.display(), bytes = upload.bytes.len(), "materializing upload");

    fs::write(&path, &upload.bytes)?;
    let bytes = fs::read(&path)?;
    let text = String::from_utf8(bytes)?;

    temp_dir.close()?;
    Ok(text)
}
