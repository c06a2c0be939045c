//! Find command implementation

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use super::utils::{collect_paths, scan_root, DiscoveryArgs};
use crate::config::Settings;

#[derive(Args)]
pub struct FindArgs {
    /// Directory to scan
    #[arg(value_name = "PATH", default_value = ".")]
    pub path: PathBuf,

    #[command(flatten)]
    pub discovery: DiscoveryArgs,
}

pub fn run(args: FindArgs, settings: &Settings) -> Result<()> {
    let root = scan_root(&args.path)?;
    let discoverer = args.discovery.discoverer(&root, settings)?;
    let found = collect_paths(&discoverer);

    println!("Found {} files in {}", found.len(), root.display());
    for (i, path) in found.iter().enumerate() {
        println!("{}: {}", i + 1, path.display());
    }
    Ok(())
}
