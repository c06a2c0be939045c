//! Post-render attribute cleanup
//!
//! Operates on the renderer's own output, where every literal `<` in text is
//! already escaped, so matching opening tags with a pattern is sound.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static OPEN_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"<([A-Za-z][A-Za-z0-9-]*)((?:\s+[^\s"'>/=]+(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'=<>`]+))?)*)\s*(/?)>"#,
    )
    .expect("valid regex")
});

static ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([^\s"'>/=]+)(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'=<>`]+))?"#)
        .expect("valid regex")
});

/// Elements whose focus-order attribute is dropped.
const CODE_BLOCK_ELEMENTS: &[&str] = &["pre", "code"];

fn is_disallowed(element: &str, attribute: &str) -> bool {
    let attribute = attribute.to_ascii_lowercase();
    if attribute.starts_with("on") {
        return true;
    }
    attribute == "tabindex"
        && CODE_BLOCK_ELEMENTS.iter().any(|e| e.eq_ignore_ascii_case(element))
}

/// Remove event-handler attributes from every element and `tabindex` from
/// `pre`/`code`. Tags that lose nothing are left byte-for-byte unchanged.
pub fn strip_disallowed_attributes(html: &str) -> String {
    OPEN_TAG.replace_all(html, |caps: &Captures| rewrite_tag(caps)).into_owned()
}

fn rewrite_tag(caps: &Captures) -> String {
    let original = caps.get(0).map_or("", |m| m.as_str());
    let element = caps.get(1).map_or("", |m| m.as_str());
    let attributes = caps.get(2).map_or("", |m| m.as_str());
    let self_closing = caps.get(3).map_or("", |m| m.as_str());

    let mut removed = false;
    let kept: Vec<&str> = ATTRIBUTE
        .captures_iter(attributes)
        .filter_map(|attr| {
            let name = attr.get(1)?.as_str();
            if is_disallowed(element, name) {
                removed = true;
                None
            } else {
                attr.get(0).map(|m| m.as_str())
            }
        })
        .collect();

    if !removed {
        return original.to_string();
    }

    let mut tag = format!("<{}", element);
    for attr in kept {
        tag.push(' ');
        tag.push_str(attr);
    }
    if !self_closing.is_empty() {
        tag.push_str(" /");
    }
    tag.push('>');
    tag
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_tabindex_on_code_blocks() {
        let html = r#"<pre tabindex="0" lang="ts"><code TabIndex='-1'>x</code></pre>"#;
        assert_eq!(strip_disallowed_attributes(html), r#"<pre lang="ts"><code>x</code></pre>"#);
    }

    #[test]
    fn keeps_tabindex_elsewhere() {
        let html = r#"<div tabindex="0"><a href="/x" tabindex=1>y</a></div>"#;
        assert_eq!(strip_disallowed_attributes(html), html);
    }

    #[test]
    fn drops_event_handlers_everywhere() {
        let html = r#"<p onclick="steal()">a</p><img src="x.png" onerror=boom alt="x" />"#;
        assert_eq!(
            strip_disallowed_attributes(html),
            r#"<p>a</p><img src="x.png" alt="x" />"#
        );
    }

    #[test]
    fn leaves_text_and_closing_tags_alone() {
        let html = "<p>a &lt;pre tabindex=0&gt; b</p>\n<hr />\n";
        assert_eq!(strip_disallowed_attributes(html), html);
    }

    #[test]
    fn idempotent() {
        let html = r#"<pre tabindex="0"><code onmouseover="x">y</code></pre>"#;
        let once = strip_disallowed_attributes(html);
        assert_eq!(strip_disallowed_attributes(&once), once);
    }
}
