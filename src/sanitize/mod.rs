//! Denylist sanitization of pasted/uploaded text and upload filenames

pub mod filename;
pub mod rules;
pub mod sanitizer;

pub use filename::secure_filename;
pub use sanitizer::strip_script_tags;
