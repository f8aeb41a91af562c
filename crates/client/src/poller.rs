//! Fixed-interval refresh into a watch channel

use newsdesk_common::analytics::AnalyticsResponse;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::api::DashboardApi;
use crate::error::Result;

pub const MIN_INTERVAL: Duration = Duration::from_secs(15);
pub const MAX_INTERVAL: Duration = Duration::from_secs(300);

/// Background refresher. The task is aborted when the poller is dropped.
pub struct Poller<T> {
    rx: watch::Receiver<Option<T>>,
    handle: JoinHandle<()>,
}

impl<T: Clone + Send + Sync + 'static> Poller<T> {
    /// Call `fetch` now and then every `interval` (clamped to 15s..=5min).
    ///
    /// Failed fetches are logged and keep the previous value.
    pub fn spawn<F, Fut>(interval: Duration, mut fetch: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let (tx, rx) = watch::channel(None);
        let period = interval.clamp(MIN_INTERVAL, MAX_INTERVAL);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                match fetch().await {
                    Ok(value) => {
                        if tx.send(Some(value)).is_err() {
                            break;
                        }
                    }
                    Err(e) => tracing::warn!(error = %e, "Poll failed, keeping previous value"),
                }
            }
        });

        Self { rx, handle }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<T>> {
        self.rx.clone()
    }

    pub fn latest(&self) -> Option<T> {
        self.rx.borrow().clone()
    }
}

impl Poller<AnalyticsResponse> {
    /// Poll the analytics payload for a trailing window of `days`
    pub fn analytics<A: DashboardApi + 'static>(api: Arc<A>, days: i64, interval: Duration) -> Self {
        Poller::spawn(interval, move || {
            let api = Arc::clone(&api);
            async move { api.analytics(days).await }
        })
    }
}

impl<T> Drop for Poller<T> {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_polls_on_interval_and_keeps_value_on_error() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);

        let poller = Poller::spawn(Duration::from_secs(1), move || {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n == 2 {
                    Err(ClientError::Status {
                        status: 500,
                        message: "boom".into(),
                    })
                } else {
                    Ok(n)
                }
            }
        });
        let mut rx = poller.subscribe();

        rx.changed().await.unwrap();
        assert_eq!(poller.latest(), Some(1));

        // Interval was clamped up to the 15s minimum; the second poll fails
        tokio::time::sleep(MIN_INTERVAL + Duration::from_millis(10)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(poller.latest(), Some(1));

        rx.changed().await.unwrap();
        assert_eq!(poller.latest(), Some(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_polling() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);

        let poller = Poller::spawn(MIN_INTERVAL, move || {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Ok(()) }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        drop(poller);

        let before = calls.load(Ordering::SeqCst);
        tokio::time::sleep(MIN_INTERVAL * 4).await;
        assert_eq!(calls.load(Ordering::SeqCst), before);
    }
}
