use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// How often the service loop wakes up to check the clock.
pub const POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Run `pass` immediately, then again every `interval` until `shutdown` fires.
///
/// The loop only looks at the clock every `poll`, so a pass may start up to one
/// poll period late. A pass that is already running is never interrupted.
/// Returns the number of passes run.
pub async fn run_service<F, Fut>(
    interval: Duration,
    poll: Duration,
    shutdown: CancellationToken,
    mut pass: F,
) -> usize
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    if shutdown.is_cancelled() {
        return 0;
    }

    pass().await;
    let mut passes = 1;
    // `None` when the interval is too large to represent; no further passes.
    let mut next_run = Instant::now().checked_add(interval);
    tracing::info!(next_run = %wall_clock_after(interval), "next sync scheduled");

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = tokio::time::sleep(poll) => {}
        }

        let now = Instant::now();
        if next_run.is_some_and(|at| now >= at) {
            pass().await;
            passes += 1;
            next_run = now.checked_add(interval);
            tracing::info!(next_run = %wall_clock_after(interval), "next sync scheduled");
        }
    }

    tracing::info!(passes, "service stopped");
    passes
}

fn wall_clock_after(interval: Duration) -> String {
    chrono::Duration::from_std(interval)
        .ok()
        .and_then(|delta| chrono::Local::now().checked_add_signed(delta))
        .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "never".to_owned())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    const HOUR: Duration = Duration::from_secs(3600);

    #[tokio::test(start_paused = true)]
    async fn runs_immediately_then_on_interval() {
        let shutdown = CancellationToken::new();
        let count = Arc::new(AtomicUsize::new(0));
        let start = Instant::now();

        let passes = run_service(HOUR, POLL_INTERVAL, shutdown.clone(), || {
            let count = Arc::clone(&count);
            let shutdown = shutdown.clone();
            async move {
                if count.fetch_add(1, Ordering::SeqCst) + 1 == 3 {
                    shutdown.cancel();
                }
            }
        })
        .await;

        assert_eq!(passes, 3);
        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert!(start.elapsed() >= HOUR * 2);
        assert!(start.elapsed() < HOUR * 2 + POLL_INTERVAL * 2);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_between_passes_stops_loop() {
        let shutdown = CancellationToken::new();
        let count = Arc::new(AtomicUsize::new(0));

        let canceller = shutdown.clone();
        tokio::spawn(async move {
            tokio::time::sleep(HOUR + HOUR / 2).await;
            canceller.cancel();
        });

        let passes = run_service(HOUR, POLL_INTERVAL, shutdown, || {
            let count = Arc::clone(&count);
            async move {
                count.fetch_add(1, Ordering::SeqCst);
            }
        })
        .await;

        assert_eq!(passes, 2);
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_before_start_runs_nothing() {
        let shutdown = CancellationToken::new();
        shutdown.cancel();

        let passes = run_service(HOUR, POLL_INTERVAL, shutdown, || async {}).await;
        assert_eq!(passes, 0);
    }

    #[test]
    fn wall_clock_label_has_date_and_time() {
        let label = wall_clock_after(HOUR);
        assert_eq!(label.len(), "2024-01-01 00:00:00".len());
        assert_eq!(wall_clock_after(Duration::MAX), "never");
    }
}
