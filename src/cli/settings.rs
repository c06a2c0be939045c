//! Config command implementation

use anyhow::{Context, Result};

use crate::config::Settings;

pub fn run(settings: &Settings) -> Result<()> {
    let rendered =
        toml::to_string_pretty(&settings.redacted()).context("Failed to serialize settings")?;
    print!("{}", rendered);
    Ok(())
}
