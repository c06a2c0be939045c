//! Report rendering: markdown to sanitized HTML, plus the page shells around it

pub mod attributes;
pub mod incremental;
pub mod markdown;
pub mod page;

pub use attributes::strip_disallowed_attributes;
pub use incremental::{render_chunks, IncrementalRenderer};
pub use markdown::MarkdownRenderer;
