//! Serve command implementation

use anyhow::Result;
use clap::Args;

use crate::config::Settings;
use crate::server::{self, AppState};

#[derive(Args)]
pub struct ServeArgs {
    /// Address to listen on (defaults to server.bind)
    #[arg(short, long, value_name = "ADDR")]
    pub bind: Option<String>,

    /// Re-render the report every N chunks while streaming (0 = once at the end)
    #[arg(long, value_name = "N")]
    pub snapshot_every: Option<usize>,
}

pub fn run(args: ServeArgs, settings: &Settings) -> Result<()> {
    let mut settings = settings.clone();
    if let Some(every) = args.snapshot_every {
        settings.render.snapshot_every = every;
    }
    let bind = args.bind.unwrap_or_else(|| settings.server.bind.clone());

    // Fails here, before binding, when no credential is configured.
    let state = AppState::from_settings(&settings)?;
    super::runtime()?.block_on(server::serve(state, &bind))
}
