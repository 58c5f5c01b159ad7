//! Rank presentation
//!
//! The refresh loop only produces text. Sinks decide how it reaches the user:
//! an in-place status segment on a terminal, or plain lines when piped.

pub mod escape;
mod status_line;

use anyhow::Result;

pub use status_line::{PlainLine, StatusLine};

/// Receives each new rank text
pub trait RankSink {
    fn show(&mut self, text: &str) -> Result<()>;
}
