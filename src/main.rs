//! refactor-review: review source files for testability with an LLM

use anyhow::Result;

fn main() -> Result<()> {
    refactor_review::cli::run()
}
