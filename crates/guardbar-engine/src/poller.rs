//! Periodic refresh loop.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

struct Run {
    interval: Duration,
    token: CancellationToken,
}

/// Runs a refresh callback on a fixed interval.
///
/// At most one loop exists at a time, and refreshes never overlap, not even
/// across a restart while a refresh is still in flight.
#[derive(Default)]
pub struct Poller {
    run: Mutex<Option<Run>>,
    in_flight: Arc<tokio::sync::Mutex<()>>,
}

impl std::fmt::Debug for Poller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Poller")
            .field("interval", &self.interval())
            .finish()
    }
}

impl Poller {
    /// Create a stopped poller
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Option<Run>> {
        self.run.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start polling, replacing any running loop. The first refresh fires
    /// immediately.
    ///
    /// A zero interval is ignored and returns `false`; the current loop, if
    /// any, keeps running.
    pub fn start<F, Fut>(&self, interval: Duration, refresh: F) -> bool
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if interval.is_zero() {
            debug!("ignoring zero polling interval");
            return false;
        }

        let token = CancellationToken::new();
        {
            let mut run = self.lock();
            if let Some(previous) = run.take() {
                previous.token.cancel();
                debug!("stopped previous polling loop");
            }
            *run = Some(Run {
                interval,
                token: token.clone(),
            });
        }

        tokio::spawn(poll_loop(
            interval,
            token,
            Arc::clone(&self.in_flight),
            refresh,
        ));
        info!(interval_secs = interval.as_secs(), "polling started");
        true
    }

    /// Stop polling. A refresh already in flight completes but no further
    /// refresh is scheduled.
    pub fn stop(&self) -> bool {
        match self.lock().take() {
            Some(run) => {
                run.token.cancel();
                info!("polling stopped");
                true
            }
            None => false,
        }
    }

    /// Whether a loop is running
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.lock().is_some()
    }

    /// Interval of the running loop
    #[must_use]
    pub fn interval(&self) -> Option<Duration> {
        self.lock().as_ref().map(|run| run.interval)
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn poll_loop<F, Fut>(
    interval: Duration,
    token: CancellationToken,
    in_flight: Arc<tokio::sync::Mutex<()>>,
    refresh: F,
) where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            () = token.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let Ok(_guard) = in_flight.try_lock() else {
            debug!("refresh still in flight, skipping tick");
            continue;
        };
        refresh().await;
    }
    debug!("polling loop exited");
}
