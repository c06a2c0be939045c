//! Request handlers

use crate::domain::SanitizedInput;
use crate::error::{PipelineError, ValidationError};
use crate::intake::accept_submission;
use crate::pipeline::{report_events, ReportEvent};
use crate::render::{page, IncrementalRenderer, MarkdownRenderer};
use crate::server::form::read_submission;
use crate::server::AppState;
use axum::body::Body;
use axum::extract::{Multipart, State};
use axum::http::{header, Response as HttpResponse, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use futures::StreamExt;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info, warn};

/// Fragments buffered between the analysis task and the socket.
const STREAM_BUFFER: usize = 16;

pub async fn home(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(page::upload_form(None, &state.policy))
}

pub async fn upload_and_analyze(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Response {
    let submission = match read_submission(multipart, state.max_payload_bytes).await {
        Ok(submission) => submission,
        Err(e) => {
            warn!(error = %e, "rejected form submission");
            return form_with_message(&state, e.status(), &e.to_string());
        }
    };

    let policy = state.policy.clone();
    let limit = state.max_payload_bytes;
    // Validation and script stripping both walk the whole payload.
    let accepted = tokio::task::spawn_blocking(move || -> Result<SanitizedInput, PipelineError> {
        let document = accept_submission(submission, &policy, limit)?;
        info!(origin = %document.origin(), bytes = document.content().len(), "analysis requested");
        Ok(document.sanitize())
    })
    .await;

    let input = match accepted {
        Ok(Ok(input)) => input,
        Ok(Err(e)) => return rejection(&state, e),
        Err(e) => {
            warn!(error = %e, "intake task failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response();
        }
    };

    stream_analysis(state, input)
}

fn rejection(state: &AppState, err: PipelineError) -> Response {
    match &err {
        PipelineError::Validation(ValidationError::TooLarge { .. }) => {
            form_with_message(state, StatusCode::PAYLOAD_TOO_LARGE, &err.user_message())
        }
        PipelineError::Validation(_) => {
            form_with_message(state, StatusCode::BAD_REQUEST, &err.user_message())
        }
        _ => {
            warn!(error = %err, "could not read submission");
            let body = format!(
                "{}{}{}",
                page::analysis_head(),
                page::error_fragment(&err.user_message()),
                page::page_tail()
            );
            (StatusCode::UNPROCESSABLE_ENTITY, Html(body)).into_response()
        }
    }
}

fn form_with_message(state: &AppState, status: StatusCode, message: &str) -> Response {
    (status, Html(page::upload_form(Some(message), &state.policy))).into_response()
}

/// Respond immediately and fill the body from a per-request task.
fn stream_analysis(state: Arc<AppState>, input: SanitizedInput) -> Response {
    let (tx, rx) = mpsc::channel::<Result<String, Infallible>>(STREAM_BUFFER);
    tokio::spawn(write_report(state, input, tx));

    HttpResponse::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/html; charset=utf-8")
        .body(Body::from_stream(ReceiverStream::new(rx)))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

/// Produces the page body. Returns early, dropping the upstream request,
/// as soon as the client goes away.
async fn write_report(
    state: Arc<AppState>,
    input: SanitizedInput,
    tx: mpsc::Sender<Result<String, Infallible>>,
) {
    if tx.send(Ok(page::analysis_head())).await.is_err() {
        return;
    }

    let started = tokio::select! {
        started = state.streamer.analyze(&input) => started,
        _ = tx.closed() => {
            debug!("client disconnected before analysis started");
            return;
        }
    };

    let tail = match started {
        Err(e) => page::error_fragment(&e.to_string()),
        Ok(chunks) => {
            let renderer =
                IncrementalRenderer::with_snapshots(MarkdownRenderer::new(), state.snapshot_every);
            let mut events = report_events(chunks, renderer);
            let mut tail = String::new();
            loop {
                let event = tokio::select! {
                    event = events.next() => event,
                    _ = tx.closed() => {
                        debug!("client disconnected; abandoning analysis");
                        return;
                    }
                };
                match event {
                    Some(Ok(ReportEvent::Chunk { snapshot: Some(html), .. })) => {
                        if tx.send(Ok(page::snapshot_fragment(&html))).await.is_err() {
                            return;
                        }
                    }
                    Some(Ok(ReportEvent::Chunk { .. })) => {}
                    Some(Ok(ReportEvent::Finished(report))) => {
                        tail = page::report_fragment(&report);
                    }
                    Some(Err(e)) => {
                        warn!(error = %e, "rendering failed");
                        tail = page::error_fragment(&e.to_string());
                    }
                    None => break,
                }
            }
            tail
        }
    };

    let _ = tx.send(Ok(format!("{}{}", tail, page::page_tail()))).await;
}
