//! Kotlin's position in the TIOBE index
//!
//! - `snapshot`: the cached (rank, fetch time) pair and its freshness rule
//! - `parser`: pulls the rank out of the index page
//! - `display`: what the status segment shows
//! - `fetcher`: decides between cache and network

mod display;
mod fetcher;
mod parser;
mod snapshot;

pub use display::{ArrowStyle, RankDisplay};
pub use fetcher::{RankError, RankFetcher};
pub use snapshot::RankSnapshot;

#[cfg(test)]
pub(crate) use fetcher::tests as test_support;
