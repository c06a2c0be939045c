//! Accumulate streamed markdown and render it, optionally with periodic snapshots

use crate::domain::{AnalysisChunk, RenderedReport, ReportStatus};
use crate::error::RenderError;
use crate::render::markdown::MarkdownRenderer;
use std::time::Instant;
use tracing::debug;

/// Joins chunks in arrival order. Markdown is only ever rendered from the whole
/// accumulated prefix, so snapshots never depend on where chunk boundaries fell
/// and the final HTML is identical with or without snapshots.
#[derive(Debug, Clone)]
pub struct IncrementalRenderer {
    renderer: MarkdownRenderer,
    markdown: String,
    chunks: usize,
    snapshot_every: usize,
}

impl IncrementalRenderer {
    /// Render once, at the end.
    pub fn buffered(renderer: MarkdownRenderer) -> Self {
        Self::with_snapshots(renderer, 0)
    }

    /// Re-render every `every` chunks. Zero disables snapshots.
    pub fn with_snapshots(renderer: MarkdownRenderer, every: usize) -> Self {
        Self { renderer, markdown: String::new(), chunks: 0, snapshot_every: every }
    }

    /// Append a chunk; returns a snapshot of everything so far when one is due.
    pub fn push(&mut self, chunk: &AnalysisChunk) -> Result<Option<String>, RenderError> {
        if chunk.index != self.chunks {
            debug!(expected = self.chunks, got = chunk.index, "chunk index out of sequence");
        }
        self.markdown.push_str(&chunk.text);
        self.chunks += 1;

        if self.snapshot_every > 0 && self.chunks % self.snapshot_every == 0 {
            return self.snapshot().map(Some);
        }
        Ok(None)
    }

    pub fn snapshot(&self) -> Result<String, RenderError> {
        self.renderer.render(&self.markdown)
    }

    pub fn markdown(&self) -> &str {
        &self.markdown
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks
    }

    pub fn finish(self, status: ReportStatus) -> Result<RenderedReport, RenderError> {
        let started = Instant::now();
        let html = self.renderer.render(&self.markdown)?;
        debug!(
            chunks = self.chunks,
            markdown_bytes = self.markdown.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "rendered report"
        );
        Ok(RenderedReport { html, status, chunk_count: self.chunks })
    }
}

/// Buffered rendering of an already collected reply.
pub fn render_chunks<'a, I>(chunks: I, status: ReportStatus) -> Result<RenderedReport, RenderError>
where
    I: IntoIterator<Item = &'a AnalysisChunk>,
{
    let mut renderer = IncrementalRenderer::buffered(MarkdownRenderer::new());
    for chunk in chunks {
        renderer.push(chunk)?;
    }
    renderer.finish(status)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunks(parts: &[&str]) -> Vec<AnalysisChunk> {
        parts
            .iter()
            .enumerate()
            .map(|(index, text)| AnalysisChunk { index, text: text.to_string() })
            .collect()
    }

    #[test]
    fn heading_then_paragraph() {
        let report =
            render_chunks(&chunks(&["## Review\n", "Looks fine."]), ReportStatus::Complete).unwrap();
        assert_eq!(report.html, "<h2>Review</h2>\n<p>Looks fine.</p>\n");
        assert_eq!(report.chunk_count, 2);
        assert!(report.is_complete());
    }

    #[test]
    fn snapshots_on_schedule() {
        let mut renderer = IncrementalRenderer::with_snapshots(MarkdownRenderer::new(), 2);
        let parts = chunks(&["# T", "itle\n", "body", " text"]);
        let snapshots: Vec<Option<String>> =
            parts.iter().map(|c| renderer.push(c).unwrap()).collect();

        assert!(snapshots[0].is_none());
        assert_eq!(snapshots[1].as_deref(), Some("<h1>Title</h1>\n"));
        assert!(snapshots[2].is_none());
        assert_eq!(snapshots[3].as_deref(), Some("<h1>Title</h1>\n<p>body text</p>\n"));
    }

    #[test]
    fn boundaries_inside_constructs_do_not_matter() {
        // Splits land inside a code fence, a link and a table row.
        let whole =
            "```ts\nconst x = 1;\n```\n\nSee [docs](https://example.com).\n\n| a | b |\n|---|---|\n| 1 | 2 |\n";
        let split = chunks(&[
            "``",
            "`ts\nconst x",
            " = 1;\n``",
            "`\n\nSee [do",
            "cs](https://exa",
            "mple.com).\n\n| a |",
            " b |\n|---|---|\n| 1 | 2 |\n",
        ]);

        let buffered = render_chunks(&chunks(&[whole]), ReportStatus::Complete).unwrap();
        let mut incremental = IncrementalRenderer::with_snapshots(MarkdownRenderer::new(), 1);
        for chunk in &split {
            incremental.push(chunk).unwrap();
        }
        let incremental = incremental.finish(ReportStatus::Complete).unwrap();
        assert_eq!(buffered.html, incremental.html);
    }

    #[test]
    fn incomplete_status_is_carried() {
        let status = ReportStatus::Incomplete { reason: "stream cut".to_string() };
        let report = render_chunks(&chunks(&["partial"]), status.clone()).unwrap();
        assert_eq!(report.status, status);
        assert_eq!(report.html, "<p>partial</p>\n");
    }

    #[test]
    fn empty_reply_renders_empty() {
        let report = render_chunks(&Vec::<AnalysisChunk>::new(), ReportStatus::Complete).unwrap();
        assert_eq!(report.html, "");
        assert_eq!(report.chunk_count, 0);
    }
}
