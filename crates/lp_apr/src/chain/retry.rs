//! Fixed-delay retry for async fetches.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

pub const MAX_RETRIES: u32 = 3;
pub const RETRY_DELAY_MS: u64 = 2000;

/// `max_retries` counts retries after the first attempt, so an operation runs
/// at most `max_retries + 1` times.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: MAX_RETRIES,
            delay: Duration::from_millis(RETRY_DELAY_MS),
        }
    }
}

/// Run `op` until it succeeds or the policy's retries are used up.
/// Every retry waits the same `delay`. The last error is returned unchanged.
pub async fn fetch_with_retry<T, E, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut attempt: u32 = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < policy.max_retries => {
                attempt += 1;
                warn!(
                    attempt,
                    max_retries = policy.max_retries,
                    error = %e,
                    "retrying ({}/{})",
                    attempt,
                    policy.max_retries
                );
                tokio::time::sleep(policy.delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::time::Instant;
    use tracing::subscriber::DefaultGuard;
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;

    /// Counts WARN events seen on this thread.
    #[derive(Clone, Default)]
    struct WarnCounter(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> Layer<S> for WarnCounter {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == tracing::Level::WARN {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    impl WarnCounter {
        fn install(&self) -> DefaultGuard {
            tracing::subscriber::set_default(tracing_subscriber::registry().with(self.clone()))
        }

        fn count(&self) -> usize {
            self.0.load(Ordering::SeqCst)
        }
    }

    // Paused clock: elapsed time is exactly the sum of retry delays, give or take a timer tick.
    fn assert_waited(start: Instant, retries: u32) {
        let expected = Duration::from_millis(u64::from(retries) * RETRY_DELAY_MS);
        let elapsed = start.elapsed();
        assert!(
            elapsed >= expected && elapsed < expected + Duration::from_millis(10),
            "elapsed {elapsed:?}, expected {expected:?}"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_after_two_failures() {
        let warnings = WarnCounter::default();
        let _guard = warnings.install();
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let policy = RetryPolicy::default();
        let start = Instant::now();
        let out: Result<&str, String> = fetch_with_retry(&policy, move || async move {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            if n < 2 {
                Err(format!("boom {n}"))
            } else {
                Ok("ok")
            }
        })
        .await;
        assert_eq!(out, Ok("ok"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_waited(start, 2);
        assert_eq!(warnings.count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausts_and_returns_last_error() {
        let warnings = WarnCounter::default();
        let _guard = warnings.install();
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let policy = RetryPolicy::default();
        let start = Instant::now();
        let out: Result<(), String> = fetch_with_retry(&policy, move || async move {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            Err(format!("fail {n}"))
        })
        .await;
        assert_eq!(out, Err("fail 3".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), MAX_RETRIES + 1);
        assert_waited(start, MAX_RETRIES);
        assert_eq!(warnings.count(), MAX_RETRIES as usize);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_retries_runs_once() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let policy = RetryPolicy {
            max_retries: 0,
            delay: Duration::from_millis(10),
        };
        let out: Result<(), &str> = fetch_with_retry(&policy, move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err("nope")
        })
        .await;
        assert!(out.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
