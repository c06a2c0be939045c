//! Config file discovery and layered loading

use crate::config::settings::Settings;
use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Toml, Yaml};
use figment::Figment;
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "REFACTOR_REVIEW_";

/// Load settings with precedence Env > File > Defaults.
///
/// An explicitly named config file must exist and parse. An auto-discovered
/// one that fails to parse is skipped with a warning, and defaults plus the
/// environment are used instead.
pub fn load_settings(root: &Path, config_path: Option<&Path>) -> Result<Settings> {
    let explicit = config_path.is_some();
    let discovered = match config_path {
        Some(path) => {
            if !path.is_file() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            Some(path.to_path_buf())
        }
        None => discover_config(root),
    };

    let Some(config_file) = discovered else {
        return extract(Figment::new());
    };

    let with_file = file_provider(&config_file).and_then(extract);
    match with_file {
        Ok(settings) => {
            tracing::debug!("Loaded config from {}", config_file.display());
            Ok(settings)
        }
        Err(e) if !explicit => {
            tracing::warn!(
                "Failed to parse auto-discovered config {}: {:#}",
                config_file.display(),
                e
            );
            extract(Figment::new())
        }
        Err(e) => Err(e),
    }
}

fn file_provider(config_file: &Path) -> Result<Figment> {
    let ext = config_file.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();
    match ext.as_str() {
        "toml" => Ok(Figment::new().merge(Toml::file(config_file))),
        "yaml" | "yml" => Ok(Figment::new().merge(Yaml::file(config_file))),
        other => anyhow::bail!(
            "Unsupported config extension '.{}' for file {}",
            other,
            config_file.display()
        ),
    }
}

/// Layer defaults under `file_layer` and the environment over it.
fn extract(file_layer: Figment) -> Result<Settings> {
    Figment::from(Serialized::defaults(Settings::default()))
        .merge(file_layer)
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .merge(Env::raw().only(&["OLLAMA_API_KEY"]).map(|_| "service.api_key".into()))
        .merge(Env::raw().only(&["OLLAMA_HOST"]).map(|_| "service.host".into()))
        .merge(Env::raw().only(&["MAX_CONTENT_LENGTH"]).map(|_| "intake.max_payload_bytes".into()))
        .extract()
        .context("Invalid configuration")
}

fn discover_config(root: &Path) -> Option<PathBuf> {
    let candidates = [
        "refactor-review.toml",
        ".refactor-review.toml",
        "refactor-review.yml",
        "refactor-review.yaml",
    ];

    candidates.iter().map(|candidate| root.join(candidate)).find(|path| path.is_file())
}
