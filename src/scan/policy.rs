//! Extension allow-lists and directory ignore-lists

use crate::error::ValidationError;
use std::collections::HashSet;

const HIDDEN_MARKER: char = '.';

/// Case-insensitive allow-list of file suffixes such as `.ts` or `.jsx`.
///
/// Built once and passed down; never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileExtensionPolicy {
    extensions: Vec<String>,
}

impl FileExtensionPolicy {
    /// Normalize (trim, lowercase, leading dot) and dedupe, keeping first-seen order.
    pub fn new<I, S>(extensions: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for ext in extensions {
            let ext = ext.as_ref().trim().to_lowercase();
            if ext.is_empty() || ext == "." {
                continue;
            }
            let ext = if ext.starts_with(HIDDEN_MARKER) { ext } else { format!(".{}", ext) };
            if !normalized.contains(&ext) {
                normalized.push(ext);
            }
        }

        if normalized.is_empty() {
            return Err(ValidationError::EmptyExtensionPolicy);
        }
        Ok(Self { extensions: normalized })
    }

    /// True when the text from the last `.` to the end, lower-cased, is allowed.
    pub fn matches(&self, filename: &str) -> bool {
        match filename.rfind(HIDDEN_MARKER) {
            Some(idx) => {
                let suffix = filename[idx..].to_lowercase();
                self.extensions.iter().any(|ext| *ext == suffix)
            }
            None => false,
        }
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Human list for messages: `.ts, .js, .tsx, or .jsx`.
    pub fn describe(&self) -> String {
        match self.extensions.as_slice() {
            [] => String::new(),
            [only] => only.clone(),
            [rest @ .., last] => format!("{}, or {}", rest.join(", "), last),
        }
    }
}

/// Directory names never descended into, plus every hidden directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryIgnorePolicy {
    names: HashSet<String>,
}

impl DirectoryIgnorePolicy {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = names
            .into_iter()
            .map(|n| n.as_ref().trim().to_lowercase())
            .filter(|n| !n.is_empty())
            .collect();
        Self { names }
    }

    pub fn excludes(&self, dir_name: &str) -> bool {
        dir_name.starts_with(HIDDEN_MARKER) || self.names.contains(&dir_name.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn web_policy() -> FileExtensionPolicy {
        FileExtensionPolicy::new([".ts", ".js", ".tsx", ".jsx"]).unwrap()
    }

    #[test]
    fn matches_suffix_case_insensitively() {
        let policy = web_policy();
        assert!(policy.matches("Component.TSX"));
        assert!(policy.matches("index.js"));
        assert!(policy.matches("archive.min.Js"));
        assert!(!policy.matches("readme.md"));
        assert!(!policy.matches("Makefile"));
        assert!(!policy.matches("script.js.bak"));
    }

    #[test]
    fn only_the_last_suffix_counts() {
        let policy = FileExtensionPolicy::new([".ts"]).unwrap();
        assert!(policy.matches("types.d.ts"));
        assert!(!policy.matches("ts"));
        assert!(!policy.matches("file.tsx"));
    }

    #[test]
    fn normalizes_configured_extensions() {
        let policy = FileExtensionPolicy::new(["TS", " .jsx ", "ts", ""]).unwrap();
        assert_eq!(policy.extensions(), &[".ts".to_string(), ".jsx".to_string()]);
    }

    #[test]
    fn empty_policy_is_rejected() {
        let empty: [&str; 0] = [];
        assert_eq!(FileExtensionPolicy::new(empty), Err(ValidationError::EmptyExtensionPolicy));
        assert_eq!(FileExtensionPolicy::new(["", "."]), Err(ValidationError::EmptyExtensionPolicy));
    }

    #[test]
    fn describe_lists_extensions() {
        assert_eq!(web_policy().describe(), ".ts, .js, .tsx, or .jsx");
        assert_eq!(FileExtensionPolicy::new(["rs"]).unwrap().describe(), ".rs");
    }

    #[test]
    fn ignore_policy_is_case_insensitive_and_skips_hidden() {
        let policy = DirectoryIgnorePolicy::new(["node_modules", "Dist"]);
        assert!(policy.excludes("node_modules"));
        assert!(policy.excludes("Node_Modules"));
        assert!(policy.excludes("dist"));
        assert!(policy.excludes(".git"));
        assert!(policy.excludes(".hidden"));
        assert!(!policy.excludes("src"));
    }
}
