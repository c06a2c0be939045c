//! Intake → analysis → render, end to end
//!
//! Reports are produced as a pull-based event stream, so the consumer decides
//! the pace and dropping the stream cancels the upstream request.

use crate::analysis::{AnalysisStreamer, ChunkStream};
use crate::domain::{AnalysisChunk, RenderedReport, ReportStatus, SourceDocument};
use crate::error::{PipelineError, RenderError};
use crate::render::{IncrementalRenderer, MarkdownRenderer};
use futures::stream::{self, BoxStream, StreamExt};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEvent {
    /// A chunk arrived; `snapshot` is the whole report so far when one was due.
    Chunk { chunk: AnalysisChunk, snapshot: Option<String> },
    /// Always the last event. Carries the partial report when the stream failed.
    Finished(RenderedReport),
}

pub type ReportEvents = BoxStream<'static, Result<ReportEvent, RenderError>>;

/// Drive `chunks` through `renderer`.
///
/// An analysis failure after the stream started does not surface as an error:
/// the text received so far is rendered and marked
/// [`ReportStatus::Incomplete`]. Only a rendering failure yields `Err`.
pub fn report_events(chunks: ChunkStream, renderer: IncrementalRenderer) -> ReportEvents {
    stream::unfold(Some((chunks, renderer)), |state| async move {
        let (mut chunks, mut renderer) = state?;
        match chunks.next().await {
            Some(Ok(chunk)) => match renderer.push(&chunk) {
                Ok(snapshot) => {
                    Some((Ok(ReportEvent::Chunk { chunk, snapshot }), Some((chunks, renderer))))
                }
                Err(e) => Some((Err(e), None)),
            },
            Some(Err(e)) => {
                warn!(chunks = renderer.chunk_count(), error = %e, "analysis incomplete");
                let status = ReportStatus::Incomplete { reason: e.to_string() };
                Some((renderer.finish(status).map(ReportEvent::Finished), None))
            }
            None => {
                info!(chunks = renderer.chunk_count(), "analysis complete");
                Some((renderer.finish(ReportStatus::Complete).map(ReportEvent::Finished), None))
            }
        }
    })
    .boxed()
}

/// Drain events down to the final report.
pub async fn collect_report(mut events: ReportEvents) -> Result<RenderedReport, RenderError> {
    while let Some(event) = events.next().await {
        if let ReportEvent::Finished(report) = event? {
            return Ok(report);
        }
    }
    // report_events always ends with Finished; an empty stream means no chunks at all.
    IncrementalRenderer::buffered(MarkdownRenderer::new()).finish(ReportStatus::Complete)
}

/// Sanitize, analyze and render `document` in one go.
///
/// `Err(AnalysisService)` means the service could not be reached, rejected
/// the request, or failed before the first chunk. Partial output comes back as an
/// incomplete report instead.
pub async fn run_analysis(
    streamer: &AnalysisStreamer,
    document: SourceDocument,
    snapshot_every: usize,
) -> Result<RenderedReport, PipelineError> {
    let input = document.sanitize();
    let chunks = streamer.analyze(&input).await?;
    let renderer = IncrementalRenderer::with_snapshots(MarkdownRenderer::new(), snapshot_every);
    Ok(collect_report(report_events(chunks, renderer)).await?)
}
