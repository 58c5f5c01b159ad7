//! Periodic rank refresh
//!
//! `tick` makes one cache-or-fetch decision and says when the next one is due.
//! `run` owns the timer: it sleeps, ticks, hands the text to the sink, and
//! repeats until shutdown. Only one tick is ever in flight.

use std::future::Future;
use std::time::Duration;

use anyhow::Result;

use crate::prefs::PrefStore;
use crate::rank::{ArrowStyle, RankDisplay, RankError, RankFetcher, RankSnapshot};
use crate::source::DocumentSource;
use crate::ui::RankSink;

/// Delay before the first tick, so startup is not held up by the fetch
pub const STARTUP_DELAY: Duration = Duration::from_secs(1);

/// Delay after a successful tick (23 hours)
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(23 * 60 * 60);

/// Delay after a failed fetch or parse (1 hour)
pub const RETRY_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Timer settings for the driver loop
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Schedule {
    pub startup_delay: Duration,
    pub refresh_interval: Duration,
    pub retry_interval: Duration,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            startup_delay: STARTUP_DELAY,
            refresh_interval: REFRESH_INTERVAL,
            retry_interval: RETRY_INTERVAL,
        }
    }
}

/// Outcome of one tick
#[derive(Debug)]
pub struct Tick {
    pub result: Result<RankDisplay, RankError>,
    pub next_delay: Duration,
}

/// Read the cached snapshot, compute the display, store the new snapshot.
///
/// Errors never touch the store. A store write failure is logged and the tick
/// still counts as a success.
pub async fn tick<S: DocumentSource>(
    fetcher: &RankFetcher<S>,
    store: &mut dyn PrefStore,
    schedule: &Schedule,
    now_ms: i64,
) -> Tick {
    let cached = RankSnapshot::load(store);

    match fetcher.compute_display_text(&cached, now_ms).await {
        Ok(update) => {
            tracing::debug!(
                rank = update.display.rank(),
                fetched = update.fetched(),
                "rank computed"
            );
            if let Some(snapshot) = update.snapshot {
                tracing::info!(previous = %cached, current = %snapshot, "rank refreshed");
                if let Err(err) = snapshot.save(store) {
                    tracing::warn!("failed to store rank: {:#}", err);
                }
            }
            Tick {
                result: Ok(update.display),
                next_delay: schedule.refresh_interval,
            }
        }
        Err(err) => {
            tracing::warn!(
                retry_in_secs = schedule.retry_interval.as_secs(),
                "rank refresh failed: {}",
                err
            );
            Tick {
                result: Err(err),
                next_delay: schedule.retry_interval,
            }
        }
    }
}

/// Current wall-clock time in epoch milliseconds
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Tick forever on the given schedule until `shutdown` completes.
///
/// Each successful tick's text goes to `sink`. A sink failure ends the loop
/// since there is nowhere left to show the rank.
pub async fn run<S, F>(
    fetcher: &RankFetcher<S>,
    store: &mut dyn PrefStore,
    sink: &mut dyn RankSink,
    style: ArrowStyle,
    schedule: Schedule,
    shutdown: F,
) -> Result<()>
where
    S: DocumentSource,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut delay = schedule.startup_delay;

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = tokio::time::sleep(delay) => {}
        }

        let outcome = tokio::select! {
            _ = &mut shutdown => break,
            outcome = tick(fetcher, store, &schedule, now_ms()) => outcome,
        };

        if let Ok(display) = &outcome.result {
            sink.show(&display.render(style))?;
        }

        tracing::debug!(next_in_secs = outcome.next_delay.as_secs(), "next rank refresh scheduled");
        delay = outcome.next_delay;
    }

    tracing::debug!("rank refresh stopped");
    Ok(())
}
