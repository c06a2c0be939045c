//! HTML shells around the rendered report
//!
//! The web layer streams `analysis_head`, then any number of snapshot
//! fragments, then the final report and `page_tail`. Later snapshots hide the
//! earlier ones with CSS, so no script is needed on the page.

use crate::domain::{RenderedReport, ReportStatus};
use crate::scan::FileExtensionPolicy;

const STYLE: &str = r#"<style>
body { font-family: system-ui, sans-serif; max-width: 60rem; margin: 2rem auto; padding: 0 1rem; line-height: 1.5; }
pre { background: #f5f5f5; padding: 0.75rem; overflow-x: auto; }
textarea { width: 100%; min-height: 16rem; font-family: monospace; }
.error { color: #b00020; border: 1px solid #b00020; padding: 0.5rem; margin: 1rem 0; }
.warning { color: #8a5300; border: 1px solid #8a5300; padding: 0.5rem; margin: 1rem 0; }
.success { color: #1b5e20; margin: 1rem 0; }
.report-snapshot:has(~ .report-snapshot), .report-snapshot:has(~ .report) { display: none; }
</style>"#;

/// Minimal escaping for text placed in element content or quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn head(title: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n{}\n</head>\n<body>\n",
        escape_html(title),
        STYLE
    )
}

/// The upload form, with an optional validation message above it.
pub fn upload_form(message: Option<&str>, policy: &FileExtensionPolicy) -> String {
    let mut page = head("Refactor review");
    page.push_str("<h1>Refactor review</h1>\n");
    if let Some(message) = message {
        page.push_str(&format!("<div class=\"error\">{}</div>\n", escape_html(message)));
    }
    let accept = policy.extensions().join(",");
    page.push_str(&format!(
        concat!(
            "<form method=\"post\" action=\"/\" enctype=\"multipart/form-data\">\n",
            "<p><label>Upload a file ({describe}): ",
            "<input type=\"file\" name=\"file\" accept=\"{accept}\"></label></p>\n",
            "<p><label>Or paste your code:<br>",
            "<textarea name=\"user-input\"></textarea></label></p>\n",
            "<p><button type=\"submit\">Analyze</button></p>\n",
            "</form>\n",
        ),
        describe = escape_html(&policy.describe()),
        accept = escape_html(&accept),
    ));
    page.push_str(page_tail());
    page
}

/// Sent before anything is known about the analysis outcome.
pub fn analysis_head() -> String {
    let mut page = head("Analysis");
    page.push_str("<h1>Analysis</h1>\n<p><a href=\"/\">Analyze something else</a></p>\n");
    page
}

pub fn snapshot_fragment(html: &str) -> String {
    format!("<div class=\"report-snapshot\">\n{}</div>\n", html)
}

/// Final report followed by its status banner.
pub fn report_fragment(report: &RenderedReport) -> String {
    format!("<div class=\"report\">\n{}</div>\n{}", report.html, status_banner(&report.status))
}

pub fn status_banner(status: &ReportStatus) -> String {
    match status {
        ReportStatus::Complete => {
            "<div class=\"success\"><strong>Analysis complete!</strong></div>\n".to_string()
        }
        ReportStatus::Incomplete { reason } => format!(
            "<div class=\"warning\"><strong>Analysis incomplete:</strong> {}</div>\n",
            escape_html(reason)
        ),
    }
}

pub fn error_fragment(message: &str) -> String {
    format!("<div class=\"error\">Error during analysis: {}</div>\n", escape_html(message))
}

pub fn page_tail() -> &'static str {
    "</body>\n</html>\n"
}

/// Self-contained page for writing a report to disk.
pub fn standalone_report(report: &RenderedReport, source: &str, generated_at: &str) -> String {
    let mut page = head(&format!("Analysis of {}", source));
    page.push_str(&format!(
        "<h1>Analysis of {}</h1>\n<p><small>Generated {}</small></p>\n",
        escape_html(source),
        escape_html(generated_at)
    ));
    page.push_str(&report_fragment(report));
    page.push_str(page_tail());
    page
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> FileExtensionPolicy {
        FileExtensionPolicy::new([".ts", ".js", ".tsx", ".jsx"]).unwrap()
    }

    fn ok_report() -> RenderedReport {
        RenderedReport { html: "<p>ok</p>\n".into(), status: ReportStatus::Complete, chunk_count: 1 }
    }

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape_html("<a href=\"x\">'&'</a>"),
            "&lt;a href=&quot;x&quot;&gt;&#x27;&amp;&#x27;&lt;/a&gt;"
        );
    }

    #[test]
    fn form_has_expected_fields() {
        let page = upload_form(None, &policy());
        assert!(page.contains("name=\"file\""));
        assert!(page.contains("name=\"user-input\""));
        assert!(page.contains("enctype=\"multipart/form-data\""));
        assert!(page.contains("accept=\".ts,.js,.tsx,.jsx\""));
        assert!(!page.contains("class=\"error\">"));
    }

    #[test]
    fn form_message_is_escaped() {
        let page = upload_form(Some("<b>bad</b>"), &policy());
        assert!(page.contains("<div class=\"error\">&lt;b&gt;bad&lt;/b&gt;</div>"));
    }

    #[test]
    fn banners_follow_status() {
        assert!(report_fragment(&ok_report()).contains("Analysis complete!"));

        let partial = RenderedReport {
            html: "<p>half</p>\n".into(),
            status: ReportStatus::Incomplete { reason: "stream <cut>".into() },
            chunk_count: 1,
        };
        let fragment = report_fragment(&partial);
        assert!(fragment.starts_with("<div class=\"report\">\n<p>half</p>\n</div>\n"));
        assert!(fragment.contains("Analysis incomplete:</strong> stream &lt;cut&gt;"));
    }

    #[test]
    fn standalone_page_is_complete_document() {
        let page = standalone_report(&ok_report(), "src/App.tsx", "2024-01-01T00:00:00Z");
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>Analysis of src/App.tsx</title>"));
        assert!(page.ends_with("</html>\n"));
    }
}
