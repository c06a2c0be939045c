//! Review instruction sent with every analysis

const REVIEW_FRAMING: &str = "\
Act as a senior front-end engineer and help me refactor the following code for testability. \
If you notice problems in the snippet, point them out and suggest a cleaner, more scalable approach. \
Apply D.R.Y. and separation-of-concerns principles, but do not over-abstract: \
more junior engineers should still be able to read the result. \
Prefer a structure that makes the code easier to test afterwards.";

/// The single user message: fixed framing, a blank line, then the code.
pub fn build_prompt(code: &str) -> String {
    format!("{}\n\n{}", REVIEW_FRAMING, code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embeds_code_after_framing() {
        let prompt = build_prompt("function f(){ return 1 }");
        assert!(prompt.starts_with("Act as a senior front-end engineer"));
        assert!(prompt.contains("testability"));
        assert!(prompt.contains("D.R.Y."));
        assert!(prompt.ends_with("\n\nfunction f(){ return 1 }"));
    }
}
