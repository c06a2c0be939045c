//! Upload/paste intake: validation, temp-file materialization, sanitization

pub mod submission;
pub mod validator;

pub use submission::accept_submission;
pub use validator::{check_payload_size, is_allowed, materialize, materialize_in};
