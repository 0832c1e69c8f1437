// ── Background poller ──
//
// One task per connected session. Each cycle tries the access lock without
// waiting: if a foreground refresh holds it, the cycle is skipped rather
// than queued. Stopping is a cancel followed by a join.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::session::Shared;

/// Lifecycle of the poller as seen from the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    Idle,
    Running,
    Stopping,
}

pub(crate) struct Poller {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl Poller {
    pub(crate) fn spawn(shared: Arc<Shared>, interval: Duration) -> Self {
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(poll_task(shared, interval, cancel.clone()));
        debug!(interval_ms = interval.as_millis(), "poller started");
        Self { cancel, handle }
    }

    pub(crate) fn state(&self) -> PollerState {
        if self.handle.is_finished() {
            PollerState::Idle
        } else if self.cancel.is_cancelled() {
            PollerState::Stopping
        } else {
            PollerState::Running
        }
    }

    pub(crate) fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Signal the task and wait until it has exited.
    pub(crate) async fn stop(self) {
        self.cancel.cancel();
        if let Err(e) = self.handle.await {
            warn!(error = %e, "poller task ended abnormally");
        }
        debug!("poller stopped");
    }
}

/// Refresh the cache on a fixed cadence until cancelled.
async fn poll_task(shared: Arc<Shared>, interval: Duration, cancel: CancellationToken) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {
                let Ok(session) = shared.session.try_lock() else {
                    debug!("access lock busy, skipping poll cycle");
                    tokio::task::yield_now().await;
                    continue;
                };
                if let Err(e) = shared.refresh(&session).await {
                    warn!(error = %e, "periodic refresh failed");
                }
            }
        }
    }
}
