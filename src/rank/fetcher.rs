//! Cache-or-fetch decision for the rank display
//!
//! `RankFetcher` never touches the preference store itself. The caller passes
//! the cached snapshot in and persists the snapshot that comes back.

use thiserror::Error;

use super::display::RankDisplay;
use super::parser::{parse_rank, ParseError};
use super::snapshot::RankSnapshot;
use crate::source::{DocumentSource, FetchError};

#[derive(Debug, Error)]
pub enum RankError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("unexpected index page: {0}")]
    Parse(#[from] ParseError),
}

/// Result of one successful computation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RankUpdate {
    pub display: RankDisplay,
    /// Snapshot to persist; None when the cached rank was still fresh
    pub snapshot: Option<RankSnapshot>,
}

impl RankUpdate {
    pub fn fetched(&self) -> bool {
        self.snapshot.is_some()
    }
}

pub struct RankFetcher<S> {
    source: S,
}

impl<S: DocumentSource> RankFetcher<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    #[cfg(test)]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Produce the rank display for `cached` at `now_ms`.
    ///
    /// A fresh snapshot is answered from cache. Otherwise the index page is
    /// fetched and parsed, and the returned update carries the snapshot to
    /// store. On error nothing should be stored.
    pub async fn compute_display_text(
        &self,
        cached: &RankSnapshot,
        now_ms: i64,
    ) -> Result<RankUpdate, RankError> {
        if cached.is_fresh(now_ms) {
            tracing::debug!(rank = cached.value, "cached rank is fresh");
            return Ok(RankUpdate {
                display: RankDisplay::Current(cached.value),
                snapshot: None,
            });
        }

        tracing::debug!(source = self.source.describe(), "fetching index page");
        let document = self.source.fetch().await?;
        let rank = parse_rank(&document)?;

        Ok(RankUpdate {
            display: RankDisplay::after_fetch(cached.value, rank),
            snapshot: Some(RankSnapshot::new(rank, now_ms)),
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::rank::snapshot::FRESHNESS_MS;

    pub(crate) const NOW: i64 = 1_700_000_000_000;

    pub(crate) fn page(rank: &str) -> String {
        format!(
            "<table>\n<tr><td>1</td><td>Python</td></tr>\n<tr><td>{}</td><td>Kotlin</td></tr>\n</table>",
            rank
        )
    }

    /// Serves canned responses in order, counting calls
    pub(crate) struct FakeSource {
        responses: Mutex<Vec<Result<String, u16>>>,
        calls: AtomicUsize,
    }

    impl FakeSource {
        pub(crate) fn new(responses: Vec<Result<String, u16>>) -> Self {
            Self {
                responses: Mutex::new(responses),
                calls: AtomicUsize::new(0),
            }
        }

        pub(crate) fn serving(document: String) -> Self {
            Self::new(vec![Ok(document)])
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DocumentSource for FakeSource {
        async fn fetch(&self) -> Result<String, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut responses = self.responses.lock().unwrap();
            let next = if responses.len() > 1 {
                responses.remove(0)
            } else {
                responses.first().cloned().unwrap_or(Err(404))
            };
            next.map_err(|status| FetchError::Status {
                url: "fake://index".to_string(),
                status,
            })
        }

        fn describe(&self) -> &str {
            "fake://index"
        }
    }

    #[tokio::test]
    async fn test_fresh_snapshot_skips_network() {
        let fetcher = RankFetcher::new(FakeSource::serving(page("20")));
        for age in [0, 1, 60_000, FRESHNESS_MS - 1] {
            let cached = RankSnapshot::new(17, NOW - age);
            let update = fetcher.compute_display_text(&cached, NOW).await.unwrap();
            assert_eq!(update.display, RankDisplay::Current(17));
            assert_eq!(update.snapshot, None);
        }
        assert_eq!(fetcher.source().calls(), 0);
    }

    #[tokio::test]
    async fn test_stale_snapshot_fetches_once() {
        for cached in [
            RankSnapshot::new(17, 0),
            RankSnapshot::new(17, NOW - FRESHNESS_MS),
            RankSnapshot::new(17, NOW - 3 * FRESHNESS_MS),
            RankSnapshot::UNSET,
        ] {
            let fetcher = RankFetcher::new(FakeSource::serving(page("17")));
            let update = fetcher.compute_display_text(&cached, NOW).await.unwrap();
            assert_eq!(fetcher.source().calls(), 1);
            assert_eq!(update.snapshot, Some(RankSnapshot::new(17, NOW)));
        }
    }

    #[tokio::test]
    async fn test_transition_formatting() {
        let fetcher = RankFetcher::new(FakeSource::serving(page("7")));
        let cached = RankSnapshot::new(5, NOW - FRESHNESS_MS);
        let update = fetcher.compute_display_text(&cached, NOW).await.unwrap();
        assert_eq!(update.display.to_string(), "#5 \u{2192} #7");
    }

    #[tokio::test]
    async fn test_first_fetch_has_no_transition() {
        let fetcher = RankFetcher::new(FakeSource::serving(page("12")));
        let update = fetcher
            .compute_display_text(&RankSnapshot::UNSET, NOW)
            .await
            .unwrap();
        assert_eq!(update.display.to_string(), "#12");
        assert!(update.fetched());
    }

    #[tokio::test]
    async fn test_same_rank_twice_has_no_transition() {
        let fetcher = RankFetcher::new(FakeSource::new(vec![Ok(page("9")), Ok(page("9"))]));

        let first = fetcher
            .compute_display_text(&RankSnapshot::new(4, 0), NOW)
            .await
            .unwrap();
        assert_eq!(first.display, RankDisplay::Changed { from: 4, to: 9 });

        let stored = first.snapshot.unwrap();
        let later = NOW + FRESHNESS_MS;
        let second = fetcher.compute_display_text(&stored, later).await.unwrap();
        assert_eq!(second.display.to_string(), "#9");
        assert_eq!(fetcher.source().calls(), 2);
    }

    #[tokio::test]
    async fn test_missing_marker_is_parse_error() {
        let fetcher = RankFetcher::new(FakeSource::serving("<html>maintenance</html>".into()));
        let err = fetcher
            .compute_display_text(&RankSnapshot::UNSET, NOW)
            .await
            .unwrap_err();
        assert!(matches!(err, RankError::Parse(ParseError::MarkerNotFound)));
    }

    #[tokio::test]
    async fn test_fetch_error_propagates() {
        let fetcher = RankFetcher::new(FakeSource::new(vec![Err(500)]));
        let err = fetcher
            .compute_display_text(&RankSnapshot::UNSET, NOW)
            .await
            .unwrap_err();
        assert!(matches!(err, RankError::Fetch(FetchError::Status { status: 500, .. })));
    }
}
