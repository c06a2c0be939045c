//! Source file discovery with extension and directory filters

pub mod discover;
pub mod policy;

pub use discover::{discover, Discovery, FileDiscoverer};
pub use policy::{DirectoryIgnorePolicy, FileExtensionPolicy};
