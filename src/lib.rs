//! refactor-review: stream source files to an LLM for a refactor-for-testability
//! review and render the critique as sanitized HTML.
//!
//! The library is organised along the request path: [`intake`] validates what
//! the user submitted, [`sanitize`] strips script blocks, [`analysis`] streams
//! the service reply as ordered chunks, and [`render`] turns the accumulated
//! markdown into HTML. [`pipeline`] wires them together; [`cli`] and
//! [`server`] are the two front ends.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod intake;
pub mod pipeline;
pub mod render;
pub mod sanitize;
pub mod scan;
pub mod server;

pub use error::{PipelineError, Result};
