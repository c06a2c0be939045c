//! Web surface: upload form on `GET /`, streamed analysis page on `POST /`

pub mod form;
pub mod routes;

use crate::analysis::AnalysisStreamer;
use crate::config::Settings;
use crate::scan::FileExtensionPolicy;
use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tracing::info;

/// Read-only state shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub streamer: AnalysisStreamer,
    pub policy: FileExtensionPolicy,
    pub max_payload_bytes: u64,
    pub snapshot_every: usize,
}

impl AppState {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let streamer = AnalysisStreamer::from_settings(&settings.service)
            .context("Cannot start the analysis service client")?;
        let policy = settings.intake.extension_policy().context("Invalid intake.extensions")?;
        Ok(Self {
            streamer,
            policy,
            max_payload_bytes: settings.intake.max_payload_bytes,
            snapshot_every: settings.render.snapshot_every,
        })
    }
}

pub fn router(state: AppState) -> Router {
    let body_limit = usize::try_from(state.max_payload_bytes).unwrap_or(usize::MAX);
    Router::new()
        .route("/", get(routes::home).post(routes::upload_and_analyze))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(Arc::new(state))
}

pub async fn serve(state: AppState, bind: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;
    let addr = listener.local_addr()?;
    info!(%addr, model = %state.streamer.model(), "serving");
    println!("Serving refactor review on http://{}/", addr);
    axum::serve(listener, router(state)).await.context("Server error")?;
    Ok(())
}
