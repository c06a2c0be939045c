//! GitHub-flavored markdown to HTML

use crate::error::RenderError;
use crate::render::attributes::strip_disallowed_attributes;
use comrak::{format_html, parse_document, Arena, Options};

/// Stateless renderer; identical input always yields identical HTML.
///
/// Raw HTML inside the markdown is escaped and shown as text, and constructs
/// the parser does not understand fall back to literal text.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, markdown: &str) -> Result<String, RenderError> {
        let options = gfm_options();
        let arena = Arena::new();
        let root = parse_document(&arena, markdown, &options);

        let mut out = Vec::with_capacity(markdown.len() * 2);
        format_html(root, &options, &mut out)?;
        let html = String::from_utf8(out)?;

        Ok(strip_disallowed_attributes(&html))
    }
}

fn gfm_options() -> Options {
    let mut options = Options::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.extension.footnotes = true;
    options.extension.tagfilter = true;
    options.render.github_pre_lang = true;
    options.render.escape = true;
    options
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(md: &str) -> String {
        MarkdownRenderer::new().render(md).unwrap()
    }

    #[test]
    fn headings_and_paragraphs() {
        let html = render("## Review\nLooks fine.");
        assert!(html.contains("<h2>Review</h2>"), "{html}");
        assert!(html.contains("<p>Looks fine.</p>"), "{html}");
    }

    #[test]
    fn gfm_extensions_enabled() {
        let html = render("| a | b |\n|---|---|\n| 1 | 2 |\n\n~~old~~ https://example.com\n");
        assert!(html.contains("<table>"), "{html}");
        assert!(html.contains("<del>old</del>"), "{html}");
        assert!(html.contains("<a href=\"https://example.com\">"), "{html}");
    }

    #[test]
    fn fenced_code_blocks() {
        let html = render("```ts\nconst a = 1 < 2;\n```\n");
        assert!(html.contains("<pre lang=\"ts\"><code>const a = 1 &lt; 2;\n</code></pre>"), "{html}");
    }

    #[test]
    fn raw_html_is_escaped_not_executed() {
        let html = render("before <img src=x onerror=alert(1)> after\n\n<script>alert(1)</script>\n");
        assert!(!html.contains("<script>"), "{html}");
        assert!(!html.contains("<img"), "{html}");
        assert!(html.contains("&lt;script&gt;"), "{html}");
    }

    #[test]
    fn plain_text_round_trips() {
        let html = render("just some words & symbols");
        assert_eq!(html, "<p>just some words &amp; symbols</p>\n");
    }

    #[test]
    fn unusual_constructs_do_not_fail() {
        for md in ["[unclosed link(", "```\nnever closed", "| lonely pipe", "<<<>>>", "\u{0}"] {
            assert!(MarkdownRenderer::new().render(md).is_ok(), "failed on {md:?}");
        }
    }

    #[test]
    fn rendering_is_deterministic() {
        let md = "# T\n\n- [x] done\n- [ ] todo\n\n```js\nx()\n```\n";
        assert_eq!(render(md), render(md));
    }
}
