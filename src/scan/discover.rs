//! Lazy directory walk yielding files that pass the extension policy.
//!
//! Traversal is depth-first with entries sorted by file name, so the order is
//! stable for a given tree. Ignored and hidden directories are pruned before
//! descent: nothing below them is read.
//!
//! Symlinks are not followed by default, so a link cycle can never be entered.
//! With [`FileDiscoverer::follow_symlinks`] enabled, `walkdir` checks each
//! linked directory against its ancestors and reports a loop as an error item
//! instead of descending.

use crate::scan::policy::{DirectoryIgnorePolicy, FileExtensionPolicy};
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Walk configuration. Each call to [`FileDiscoverer::walk`] starts a fresh traversal.
#[derive(Debug, Clone)]
pub struct FileDiscoverer {
    root: PathBuf,
    extensions: FileExtensionPolicy,
    ignore: DirectoryIgnorePolicy,
    follow_symlinks: bool,
}

impl FileDiscoverer {
    pub fn new(
        root: impl Into<PathBuf>,
        extensions: FileExtensionPolicy,
        ignore: DirectoryIgnorePolicy,
    ) -> Self {
        Self { root: root.into(), extensions, ignore, follow_symlinks: false }
    }

    /// Set whether to follow symbolic links (loops are detected and reported)
    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn walk(&self) -> Discovery {
        let walker =
            WalkDir::new(&self.root).follow_links(self.follow_symlinks).sort_by_file_name();
        Discovery {
            walker: walker.into_iter(),
            extensions: self.extensions.clone(),
            ignore: self.ignore.clone(),
        }
    }
}

/// Shorthand for `FileDiscoverer::new(root, ..).walk()`.
pub fn discover(
    root: impl AsRef<Path>,
    extensions: &FileExtensionPolicy,
    ignore: &DirectoryIgnorePolicy,
) -> Discovery {
    FileDiscoverer::new(root.as_ref(), extensions.clone(), ignore.clone()).walk()
}

/// Pull-based sequence of matching paths.
///
/// Yields `Err` for entries that could not be read (permissions, symlink loops);
/// iteration may continue past an error. `None` marks the end of the tree.
pub struct Discovery {
    walker: walkdir::IntoIter,
    extensions: FileExtensionPolicy,
    ignore: DirectoryIgnorePolicy,
}

impl Iterator for Discovery {
    type Item = io::Result<PathBuf>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(err) => return Some(Err(err.into())),
            };

            let name = entry.file_name().to_string_lossy().into_owned();

            if entry.file_type().is_dir() {
                // The root itself is never filtered, even if it is `.` or hidden.
                if entry.depth() > 0 && self.ignore.excludes(&name) {
                    debug!(path = %entry.path().display(), "skipping directory");
                    self.walker.skip_current_dir();
                }
                continue;
            }

            // Without follow_links a symlinked file reports a symlink type;
            // `is_file` resolves it, while links to directories stay excluded.
            if !entry.path().is_file() {
                continue;
            }

            if self.extensions.matches(&name) {
                return Some(Ok(entry.into_path()));
            }
        }
    }
}
