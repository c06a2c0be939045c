//! Script-tag stripping

const OPEN_TAG: &[u8] = b"<script";
const CLOSE_TAG: &[u8] = b"</script";

/// Remove every `<script>…</script>` block, case-insensitively.
///
/// Characters are copied to the output one at a time and a block is cut from
/// the output as soon as its closing tag completes. Cutting from the output
/// means fragments that only form a new block once an inner block is gone
/// (`<scr<script></script>ipt>`) are removed as well. The result never contains
/// a [`SCRIPT_BLOCK`](crate::sanitize::rules::SCRIPT_BLOCK) match, so the
/// function is idempotent. Every character is pushed once and cut at most
/// once, which keeps the pass linear in the input length.
pub fn strip_script_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    // Starts of complete opening tags with no closing tag after them yet.
    let mut open_tags: Vec<usize> = Vec::new();
    // Earliest `<script` start since the last `>`.
    let mut pending_open: Option<usize> = None;

    for c in input.chars() {
        if pending_open.is_none() && !is_word_char(c) && ends_with_ignore_case(&out, OPEN_TAG) {
            pending_open = Some(out.len() - OPEN_TAG.len());
        }
        if c != '>' {
            out.push(c);
            continue;
        }
        if let Some(&start) = open_tags.first() {
            if ends_with_ignore_case(out.trim_end_matches(char::is_whitespace), CLOSE_TAG) {
                // The leftmost open tag pairs with the first close after it.
                out.truncate(start);
                open_tags.clear();
                pending_open = None;
                continue;
            }
        }
        out.push('>');
        if let Some(start) = pending_open.take() {
            open_tags.push(start);
        }
    }

    if out.len() < input.len() {
        tracing::debug!(removed = input.len() - out.len(), "stripped script block(s)");
    }
    out
}

fn ends_with_ignore_case(text: &str, suffix: &[u8]) -> bool {
    let bytes = text.as_bytes();
    bytes.len() >= suffix.len() && bytes[bytes.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
