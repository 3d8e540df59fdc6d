//! Background poller for the header cart badge.
//!
//! One spawned task refreshes the cart item count on a fixed interval
//! and publishes it through a `watch` channel. The task awaits each
//! fetch before the next tick, so polls never overlap; missed ticks
//! are skipped rather than bursted. Stopping is explicit via
//! [`CartBadgePoller::stop`], and dropping the handle stops the task as
//! well.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use wildmint_client::ApiClient;

/// How often the badge refreshes unless the caller picks a period.
pub const DEFAULT_POLL_PERIOD: Duration = Duration::from_secs(30);

/// Handle to the background cart-count task.
pub struct CartBadgePoller {
    shutdown: Arc<Notify>,
    handle: Option<JoinHandle<()>>,
    count: watch::Receiver<u32>,
}

impl CartBadgePoller {
    /// Spawns the poller. Must be called from within a tokio runtime.
    ///
    /// The first poll happens immediately, so the badge fills in without
    /// waiting a full period.
    #[must_use]
    pub fn spawn(api: ApiClient, period: Duration) -> Self {
        let (tx, rx) = watch::channel(0u32);
        let shutdown = Arc::new(Notify::new());
        let handle = tokio::spawn(poll_loop(api, period, tx, Arc::clone(&shutdown)));
        Self {
            shutdown,
            handle: Some(handle),
            count: rx,
        }
    }

    /// The latest published cart item count.
    #[must_use]
    pub fn count(&self) -> u32 {
        *self.count.borrow()
    }

    /// A receiver the view can watch for count changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u32> {
        self.count.clone()
    }

    /// Stops the task and waits for it to finish.
    pub async fn stop(mut self) {
        self.shutdown.notify_one();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                warn!(error = %e, "cart badge poller task failed");
            }
        }
    }
}

impl Drop for CartBadgePoller {
    fn drop(&mut self) {
        // Fire-and-forget: the task sees the permit at its next select.
        self.shutdown.notify_one();
    }
}

async fn poll_loop(
    api: ApiClient,
    period: Duration,
    counts: watch::Sender<u32>,
    shutdown: Arc<Notify>,
) {
    let mut ticks = tokio::time::interval(period);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
    debug!(?period, "cart badge poller started");

    loop {
        tokio::select! {
            () = shutdown.notified() => {
                break;
            }
            _ = ticks.tick() => {
                match api.fetch_cart().await {
                    Ok(lines) => {
                        let total: u32 = lines.iter().map(|l| l.quantity).sum();
                        if counts.send(total).is_err() {
                            // Every receiver is gone; nothing to update.
                            break;
                        }
                    }
                    Err(e) if e.requires_login() => {
                        // Signed out: an empty badge, not an error.
                        let _ = counts.send(0);
                    }
                    Err(e) => {
                        debug!(error = %e, "cart poll failed, keeping last count");
                    }
                }
            }
        }
    }
    debug!("cart badge poller stopped");
}

#[cfg(test)]
mod tests {
    use std::sync::Arc as StdArc;

    use wildmint_client::{ApiConfig, InMemorySessionStore};

    use super::*;

    fn client() -> ApiClient {
        let config = ApiConfig::for_base_url("http://127.0.0.1:1".parse().expect("valid url"));
        ApiClient::new(&config, StdArc::new(InMemorySessionStore::new())).expect("client")
    }

    #[tokio::test]
    async fn test_stop_completes_even_mid_period() {
        // A huge period: after the immediate first poll the task sits in
        // select until the shutdown permit arrives.
        let poller = CartBadgePoller::spawn(client(), Duration::from_secs(3600));
        poller.stop().await;
    }

    #[tokio::test]
    async fn test_unreachable_api_keeps_count_at_zero() {
        let poller = CartBadgePoller::spawn(client(), Duration::from_secs(3600));
        tokio::task::yield_now().await;
        assert_eq!(poller.count(), 0);
        poller.stop().await;
    }
}
