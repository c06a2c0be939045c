//! Sanitization patterns
//!
//! Only the `<script>` vector is covered. This is not an HTML sanitizer; the
//! rendered report is protected separately by the markdown renderer escaping
//! raw HTML.

use once_cell::sync::Lazy;
use regex::Regex;

/// A `<script ...>` block: opening tag, any body (across lines, shortest match), closing tag.
/// Text returned by [`strip_script_tags`](crate::sanitize::strip_script_tags) never matches it.
pub static SCRIPT_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").expect("valid regex")
});

/// Characters removed from a stored upload name.
pub static UNSAFE_FILENAME_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_.-]").expect("valid regex"));
