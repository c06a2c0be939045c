//! Analyze command implementation

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use console::style;
use dialoguer::{theme::ColorfulTheme, Select};
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::utils::{collect_paths, scan_root, DiscoveryArgs};
use crate::analysis::AnalysisStreamer;
use crate::config::Settings;
use crate::domain::{RenderedReport, ReportStatus, SourceDocument};
use crate::error::PipelineError;
use crate::pipeline::{report_events, ReportEvent};
use crate::render::{page, IncrementalRenderer, MarkdownRenderer};

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Directory to pick a file from
    #[arg(value_name = "PATH", default_value = ".")]
    pub path: PathBuf,

    /// Analyze this file directly instead of choosing from a list
    #[arg(short = 'f', long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    #[command(flatten)]
    pub discovery: DiscoveryArgs,

    /// Also write the rendered report as an HTML page
    #[arg(long, value_name = "OUT")]
    pub html: Option<PathBuf>,
}

pub fn run(args: AnalyzeArgs, settings: &Settings) -> Result<()> {
    // Before any prompt, so a missing credential is reported first.
    let streamer = AnalysisStreamer::from_settings(&settings.service)
        .context("Cannot start the analysis service client")?;

    let chosen = match &args.file {
        Some(file) => file.clone(),
        None => match choose_file(&args, settings)? {
            Some(path) => path,
            None => return Ok(()),
        },
    };

    let document = read_document(&chosen)?;
    let report = super::runtime()?.block_on(stream_to_terminal(&streamer, document))?;

    if let Some(out) = &args.html {
        let page = page::standalone_report(
            &report,
            &chosen.display().to_string(),
            &Utc::now().to_rfc3339(),
        );
        fs::write(out, page)
            .with_context(|| format!("Failed to write report to {}", out.display()))?;
        eprintln!("Wrote report to {}", out.display());
    }

    match report.status {
        ReportStatus::Complete => {
            eprintln!("{}", style("Analysis complete!").green().bold());
            Ok(())
        }
        ReportStatus::Incomplete { reason } => anyhow::bail!("Analysis incomplete: {}", reason),
    }
}

fn choose_file(args: &AnalyzeArgs, settings: &Settings) -> Result<Option<PathBuf>> {
    let root = scan_root(&args.path)?;
    let found = collect_paths(&args.discovery.discoverer(&root, settings)?);
    if found.is_empty() {
        println!("No matching files found in {}", root.display());
        return Ok(None);
    }

    println!("Found {} files in {}", found.len(), root.display());
    let items: Vec<String> = found
        .iter()
        .enumerate()
        .map(|(i, path)| {
            format!("{}: {}", i + 1, path.strip_prefix(&root).unwrap_or(path).display())
        })
        .collect();

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Which file would you like to analyze?")
        .default(0)
        .items(&items)
        .interact()
        .context("Interactive selection needs a terminal; pass --file instead")?;

    Ok(found.get(selection).cloned())
}

fn read_document(path: &Path) -> Result<SourceDocument> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let content = String::from_utf8(bytes)
        .map_err(PipelineError::from)
        .with_context(|| format!("Cannot analyze {}", path.display()))?;
    Ok(SourceDocument::uploaded(content, path.display().to_string()))
}

fn waiting_spinner(model: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(format!("Waiting for {}...", model));
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

/// Echo chunks to stdout as they arrive; the rendered report is returned for `--html`.
async fn stream_to_terminal(
    streamer: &AnalysisStreamer,
    document: SourceDocument,
) -> Result<RenderedReport> {
    let spinner = waiting_spinner(streamer.model());
    let input = document.sanitize();
    let chunks = match streamer.analyze(&input).await {
        Ok(chunks) => chunks,
        Err(e) => {
            spinner.finish_and_clear();
            return Err(PipelineError::from(e).into());
        }
    };

    let mut events =
        report_events(chunks, IncrementalRenderer::buffered(MarkdownRenderer::new()));
    let mut stdout = io::stdout();
    while let Some(event) = events.next().await {
        match event? {
            ReportEvent::Chunk { chunk, .. } => {
                if !spinner.is_finished() {
                    spinner.finish_and_clear();
                }
                write!(stdout, "{}", chunk.text)?;
                stdout.flush()?;
            }
            ReportEvent::Finished(report) => {
                spinner.finish_and_clear();
                writeln!(stdout)?;
                return Ok(report);
            }
        }
    }

    spinner.finish_and_clear();
    anyhow::bail!("Analysis stream ended without a report")
}
