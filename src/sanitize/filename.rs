//! Path-traversal-safe upload names

use crate::sanitize::rules::UNSAFE_FILENAME_CHARS;

const FALLBACK_NAME: &str = "upload";

/// Reduce a client-supplied filename to a single safe path component.
///
/// Directory parts (either separator) are dropped, whitespace becomes `_`,
/// anything outside `[A-Za-z0-9_.-]` is removed and leading dots/underscores
/// are trimmed so the result can never be `..` or a hidden file. Returns
/// `"upload"` when nothing usable remains.
pub fn secure_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or("");
    let joined = base.split_whitespace().collect::<Vec<_>>().join("_");
    let cleaned = UNSAFE_FILENAME_CHARS.replace_all(&joined, "");
    let trimmed = cleaned.trim_start_matches(['.', '_']);

    if trimmed.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_ordinary_names() {
        assert_eq!(secure_filename("Component.tsx"), "Component.tsx");
        assert_eq!(secure_filename("my-file_v2.js"), "my-file_v2.js");
    }

    #[test]
    fn drops_directory_components() {
        assert_eq!(secure_filename("../../etc/passwd.js"), "passwd.js");
        assert_eq!(secure_filename(r"C:\Users\me\app.ts"), "app.ts");
    }

    #[test]
    fn replaces_whitespace_and_strips_odd_characters() {
        assert_eq!(secure_filename("my cool  file.ts"), "my_cool_file.ts");
        assert_eq!(secure_filename("naïve$(rm).jsx"), "naverm.jsx");
    }

    #[test]
    fn never_yields_hidden_or_empty_names() {
        assert_eq!(secure_filename(".env.js"), "env.js");
        assert_eq!(secure_filename(".."), "upload");
        assert_eq!(secure_filename(""), "upload");
        assert_eq!(secure_filename("///"), "upload");
    }
}
