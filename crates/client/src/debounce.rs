//! Quiet-period waiting for watch channels

use std::time::Duration;
use tokio::sync::watch;

/// Wait for the next change, then until no further change arrives for `quiet`.
///
/// Returns the value current at that point, or `None` if the sender went away
/// before anything changed.
pub async fn settled<T: Clone>(rx: &mut watch::Receiver<T>, quiet: Duration) -> Option<T> {
    rx.changed().await.ok()?;

    loop {
        match tokio::time::timeout(quiet, rx.changed()).await {
            Ok(Ok(())) => continue,
            // Quiet period elapsed, or the sender closed after the last change
            Err(_) | Ok(Err(_)) => return Some(rx.borrow_and_update().clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_burst_collapses_to_last_value() {
        let (tx, mut rx) = watch::channel(0u32);

        let writer = tokio::spawn(async move {
            for v in 1..=5 {
                tx.send_replace(v);
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
            // Keep the sender alive past the quiet period
            tokio::time::sleep(Duration::from_secs(1)).await;
        });

        let value = settled(&mut rx, Duration::from_millis(300)).await;
        assert_eq!(value, Some(5));
        writer.await.unwrap();
    }

    #[tokio::test]
    async fn test_closed_without_change() {
        let (tx, mut rx) = watch::channel(0u32);
        drop(tx);
        assert_eq!(settled(&mut rx, Duration::from_millis(10)).await, None);
    }
}
