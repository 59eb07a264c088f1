//! Timer-driven endpoint polling.
//!
//! [`Poller::begin_polling`] starts a session for one endpoint: it fetches
//! once right away, then once per interval, and publishes every successful
//! result to that endpoint's channel in the [`Registry`].  The returned
//! [`PollHandle`] stops the session when it is dropped.
//!
//! ## For contributors
//!
//! The poller is intentionally simple:
//!
//! * Sessions are independent.  Two consumers polling the same endpoint run
//!   two timers and issue two requests per tick.
//! * Ticks never wait for the previous fetch.  Each fetch is its own task, so
//!   a slow response overlaps the next one and whichever *finishes* last
//!   owns the snapshot.
//! * A failed fetch keeps the old snapshot and raises one notification.
//!   There is no backoff; the next tick simply tries again.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::error::PollError;
use crate::notify::{Notification, Notifier};
use crate::registry::Registry;
use crate::source::EndpointKey;

/// How often a session re-fetches its endpoint.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Starts poll sessions against a shared registry.
#[derive(Clone)]
pub struct Poller {
    registry: Arc<Registry>,
    notifier: Arc<dyn Notifier>,
    interval: Duration,
}

impl Poller {
    pub fn new(registry: Arc<Registry>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            registry,
            notifier,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Override the tick period.  Zero is clamped to one millisecond.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(Duration::from_millis(1));
        self
    }

    #[cfg(test)]
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Start a session for `key`.
    ///
    /// The first fetch is issued as soon as the runtime gets a turn; the
    /// next one a full interval later.
    ///
    /// Must be called from within a current-thread tokio runtime.  The
    /// liveness check and the publish in a fetch are two steps, so on a
    /// multi-threaded runtime a fetch finishing while the handle is being
    /// dropped can still publish once after `stop` returns.
    pub fn begin_polling(&self, key: EndpointKey) -> PollHandle {
        let live = Arc::new(AtomicBool::new(true));
        let ticker = tokio::spawn(run_session(self.clone(), key, Arc::clone(&live)));
        info!(%key, interval_ms = self.interval.as_millis() as u64, "poll session started");
        PollHandle { key, live, ticker }
    }

    /// One fetch attempt.  Publishes or notifies only if the session is
    /// still live when the response arrives.
    async fn fetch_once(self, key: EndpointKey, live: Arc<AtomicBool>) {
        // The tick may have fired just before the session was stopped.
        if !live.load(Ordering::SeqCst) {
            return;
        }

        let endpoint = self.registry.endpoint(key);
        let result = endpoint.source.fetch(key).await;

        if !live.load(Ordering::SeqCst) {
            debug!(%key, "session stopped mid-fetch, discarding result");
            return;
        }

        match result {
            Ok(items) => {
                debug!(%key, items = items.len(), "publishing snapshot");
                endpoint.channel.publish(items);
            }
            Err(source) => {
                let err = PollError::FetchFailed { key, source };
                warn!(%key, error = ?err, "fetch failed, keeping previous snapshot");
                self.notifier.notify(Notification::fetch_failed(&err));
            }
        }
    }
}

/// The ticker task.  Spawns one fetch per tick and never awaits them.
async fn run_session(poller: Poller, key: EndpointKey, live: Arc<AtomicBool>) {
    let mut ticks = time::interval(poller.interval);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticks.tick().await;
        if !live.load(Ordering::SeqCst) {
            return;
        }
        tokio::spawn(poller.clone().fetch_once(key, Arc::clone(&live)));
    }
}

/// A running poll session.
///
/// Dropping the handle (or calling [`stop`](PollHandle::stop)) cancels the
/// timer: no tick that has not fired yet will fetch, and a fetch already in
/// flight has its result thrown away.
#[must_use = "dropping a PollHandle stops its session immediately"]
pub struct PollHandle {
    key: EndpointKey,
    live: Arc<AtomicBool>,
    ticker: JoinHandle<()>,
}

impl PollHandle {
    pub fn key(&self) -> EndpointKey {
        self.key
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    /// Stop the session.  Equivalent to dropping the handle.
    pub fn stop(self) {}
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        if self.live.swap(false, Ordering::SeqCst) {
            self.ticker.abort();
            info!(key = %self.key, "poll session stopped");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
