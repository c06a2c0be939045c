//! End-to-end pipeline tests against an in-process backend

mod common;

use common::{RefusingBackend, ScriptedBackend};
use futures::stream::{self, StreamExt};
use refactor_review::analysis::AnalysisStreamer;
use refactor_review::domain::{AnalysisChunk, ReportStatus, SourceDocument};
use refactor_review::error::{AnalysisError, PipelineError};
use refactor_review::pipeline::{collect_report, report_events, run_analysis};
use refactor_review::render::{IncrementalRenderer, MarkdownRenderer};
use std::sync::Arc;

const REVIEW: &str = concat!(
    "## Review\n\n",
    "- **Issue:** duplicated fetch logic\n",
    "- Extract `useUser` hook\n\n",
    "```tsx\nconst user = useUser(id);\n```\n",
);

#[tokio::test]
async fn renders_a_complete_review() {
    let backend = Arc::new(ScriptedBackend::ok(&[
        "## Review\n\n- **Issue:** dup",
        "licated fetch logic\n- Extract `useUser` hook\n\n```tsx\nconst user",
        " = useUser(id);\n```\n",
    ]));
    let streamer = AnalysisStreamer::new(backend.clone(), "test-model");

    let report = run_analysis(&streamer, SourceDocument::pasted("const a = 1;"), 0).await.unwrap();

    assert!(report.is_complete());
    assert_eq!(report.chunk_count, 3);
    insta::assert_snapshot!(report.html, @r###"
    <h2>Review</h2>
    <ul>
    <li><strong>Issue:</strong> duplicated fetch logic</li>
    <li>Extract <code>useUser</code> hook</li>
    </ul>
    <pre lang="tsx"><code>const user = useUser(id);
    </code></pre>
    "###);
}

#[tokio::test]
async fn scripts_never_reach_the_service() {
    let backend = Arc::new(ScriptedBackend::ok(&["ok"]));
    let streamer = AnalysisStreamer::new(backend.clone(), "test-model");
    let code = "<SCRIPT src=x>\nfetch('/steal')\n</script>export const a = 1;";

    run_analysis(&streamer, SourceDocument::uploaded(code, "a.ts"), 0).await.unwrap();

    let prompts = backend.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].ends_with("export const a = 1;"));
    assert!(!prompts[0].to_lowercase().contains("<script"));
    assert!(!prompts[0].contains("/steal"));
}

#[tokio::test]
async fn buffered_and_incremental_agree() {
    let bytes: Vec<char> = REVIEW.chars().collect();
    let parts: Vec<String> = bytes.chunks(3).map(|c| c.iter().collect()).collect();
    let chunks = || {
        let items: Vec<Result<AnalysisChunk, AnalysisError>> = parts
            .iter()
            .enumerate()
            .map(|(index, text)| Ok(AnalysisChunk { index, text: text.clone() }))
            .collect();
        stream::iter(items).boxed()
    };

    let buffered = collect_report(report_events(
        chunks(),
        IncrementalRenderer::buffered(MarkdownRenderer::new()),
    ))
    .await
    .unwrap();
    let incremental = collect_report(report_events(
        chunks(),
        IncrementalRenderer::with_snapshots(MarkdownRenderer::new(), 2),
    ))
    .await
    .unwrap();

    similar_asserts::assert_eq!(buffered.html, incremental.html);
    assert_eq!(buffered.chunk_count, parts.len());
}

#[tokio::test]
async fn mid_stream_failure_keeps_partial_report() {
    let backend = Arc::new(ScriptedBackend::new(vec![
        Ok("## Partial\n"),
        Ok("Half of the "),
        Err(AnalysisError::Service("model overloaded".to_string())),
    ]));
    let streamer = AnalysisStreamer::new(backend, "test-model");

    let report = run_analysis(&streamer, SourceDocument::pasted("x"), 1).await.unwrap();

    assert_eq!(report.html, "<h2>Partial</h2>\n<p>Half of the</p>\n");
    assert_eq!(report.chunk_count, 2);
    assert_eq!(
        report.status,
        ReportStatus::Incomplete { reason: "model overloaded".to_string() }
    );
}

#[tokio::test]
async fn initiation_failure_is_a_service_error() {
    let streamer = AnalysisStreamer::new(Arc::new(RefusingBackend), "test-model");

    let err = run_analysis(&streamer, SourceDocument::pasted("x"), 0).await.unwrap_err();

    assert!(matches!(
        err,
        PipelineError::AnalysisService(AnalysisError::Status { status: 401, .. })
    ));
    assert!(err.user_message().starts_with("Error calling analysis service"));
}

#[tokio::test]
async fn failure_before_first_chunk_is_a_service_error() {
    let backend = Arc::new(ScriptedBackend::new(vec![Err(AnalysisError::Service(
        "model not found".to_string(),
    ))]));
    let streamer = AnalysisStreamer::new(backend, "test-model");

    let err = run_analysis(&streamer, SourceDocument::pasted("x"), 0).await.unwrap_err();

    match err {
        PipelineError::AnalysisService(e) => {
            assert_eq!(e, AnalysisError::Service("model not found".to_string()))
        }
        other => panic!("expected a service error, got {other:?}"),
    }
}

#[tokio::test]
async fn model_markup_is_escaped() {
    let backend = Arc::new(ScriptedBackend::ok(&["Avoid <img src=x onerror=alert(1)> here.\n"]));
    let streamer = AnalysisStreamer::new(backend, "test-model");

    let report = run_analysis(&streamer, SourceDocument::pasted("x"), 0).await.unwrap();

    assert!(!report.html.contains("<img"));
    assert!(report.html.contains("&lt;img"));
}
