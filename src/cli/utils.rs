//! Shared CLI utilities.

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::scan::{DirectoryIgnorePolicy, FileDiscoverer, FileExtensionPolicy};

/// Discovery flags shared by `find` and `analyze`; unset flags fall back to config.
#[derive(Args, Debug, Default)]
pub struct DiscoveryArgs {
    /// Include only these extensions (comma-separated, e.g., '.tsx,.jsx')
    #[arg(short = 'e', long, value_name = "EXTS")]
    pub extensions: Option<String>,

    /// Skip directories with these names (comma-separated)
    #[arg(short = 'x', long, value_name = "DIRS")]
    pub ignored_directories: Option<String>,

    /// Follow symbolic links when scanning
    #[arg(long)]
    pub follow_symlinks: bool,
}

impl DiscoveryArgs {
    pub fn discoverer(&self, root: &Path, settings: &Settings) -> Result<FileDiscoverer> {
        let extensions = match parse_csv(&self.extensions) {
            Some(list) => FileExtensionPolicy::new(list),
            None => settings.discover.extension_policy(),
        }
        .context("No usable file extensions given")?;

        let ignore = match parse_csv(&self.ignored_directories) {
            Some(list) => DirectoryIgnorePolicy::new(list),
            None => settings.discover.ignore_policy(),
        };

        Ok(FileDiscoverer::new(root, extensions, ignore)
            .follow_symlinks(self.follow_symlinks || settings.discover.follow_symlinks))
    }
}

/// Canonical directory to scan, with a readable error for bad input.
pub fn scan_root(path: &Path) -> Result<PathBuf> {
    let root = path
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", path.display()))?;
    if !root.is_dir() {
        anyhow::bail!("Path is not a directory: {}", root.display());
    }
    Ok(root)
}

/// Walk the tree, logging unreadable entries instead of failing on them.
pub fn collect_paths(discoverer: &FileDiscoverer) -> Vec<PathBuf> {
    discoverer
        .walk()
        .filter_map(|item| match item {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .collect()
}

/// Parse a comma-separated string into a `Vec<String>`, trimming whitespace and
/// discarding empty segments.  Returns `None` when `value` is `None`.
pub fn parse_csv(value: &Option<String>) -> Option<Vec<String>> {
    value.as_ref().map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| part.to_string())
            .collect::<Vec<_>>()
    })
}
