//! Bounded polling.
//!
//! Every action and expectation in the probe is retried until it succeeds or
//! its wait window closes. Nothing is cached between polls: each attempt
//! re-queries the page.

use crate::result::{ProbeError, ProbeResult};
use std::future::Future;
use std::time::{Duration, Instant};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default timeout for wait operations (4 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 4_000;

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

// =============================================================================
// WAIT OPTIONS
// =============================================================================

/// Options for wait operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

// =============================================================================
// WAIT RESULT
// =============================================================================

/// Outcome of a polling loop
#[derive(Debug, Clone)]
pub struct Waited<T> {
    /// Last value produced by the probe
    pub value: T,
    /// Time spent polling
    pub elapsed: Duration,
    /// Whether `value` satisfied the condition
    pub satisfied: bool,
}

impl<T> Waited<T> {
    /// Elapsed time in whole milliseconds
    #[must_use]
    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.elapsed.as_millis()).unwrap_or(u64::MAX)
    }
}

// =============================================================================
// POLLING
// =============================================================================

/// Poll `probe` until `accept` holds for its output or the window closes.
///
/// The probe runs at least once. Probe errors end the wait immediately; an
/// unsatisfied condition at timeout is reported through
/// [`Waited::satisfied`] together with the last observed value, so callers
/// can describe what they actually saw.
pub async fn wait_for<T, F, Fut, A>(
    options: &WaitOptions,
    mut probe: F,
    accept: A,
) -> ProbeResult<Waited<T>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ProbeResult<T>>,
    A: Fn(&T) -> bool,
{
    let start = Instant::now();
    let timeout = options.timeout();

    loop {
        let value = probe().await?;
        if accept(&value) {
            return Ok(Waited {
                value,
                elapsed: start.elapsed(),
                satisfied: true,
            });
        }
        if start.elapsed() >= timeout {
            return Ok(Waited {
                value,
                elapsed: start.elapsed(),
                satisfied: false,
            });
        }
        tokio::time::sleep(options.poll_interval()).await;
    }
}

/// Poll `probe` until it yields `Some`, failing with
/// [`ProbeError::ElementNotFound`] once the window closes.
pub async fn wait_for_element<T, F, Fut>(
    options: &WaitOptions,
    description: &str,
    mut probe: F,
) -> ProbeResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ProbeResult<Option<T>>>,
{
    let waited = wait_for(options, &mut probe, Option::is_some).await?;
    let elapsed_ms = waited.elapsed_ms();
    waited.value.ok_or_else(|| ProbeError::ElementNotFound {
        selector: description.to_string(),
        waited_ms: elapsed_ms,
    })
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    mod wait_options_tests {
        use super::*;

        #[test]
        fn test_wait_options_default() {
            let opts = WaitOptions::default();
            assert_eq!(opts.timeout_ms, DEFAULT_WAIT_TIMEOUT_MS);
            assert_eq!(opts.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
        }

        #[test]
        fn test_wait_options_builders() {
            let opts = WaitOptions::new().with_timeout(5000).with_poll_interval(10);
            assert_eq!(opts.timeout(), Duration::from_secs(5));
            assert_eq!(opts.poll_interval(), Duration::from_millis(10));
        }
    }

    mod wait_for_tests {
        use super::*;

        fn fast() -> WaitOptions {
            WaitOptions::new().with_timeout(100).with_poll_interval(5)
        }

        #[tokio::test]
        async fn test_immediately_satisfied() {
            let waited = wait_for(&fast(), || async { Ok(3) }, |v| *v == 3)
                .await
                .unwrap();
            assert!(waited.satisfied);
            assert_eq!(waited.value, 3);
        }

        #[tokio::test]
        async fn test_satisfied_after_several_polls() {
            let counter = AtomicUsize::new(0);
            let calls = &counter;
            let waited = wait_for(
                &fast(),
                move || async move { Ok(calls.fetch_add(1, Ordering::SeqCst) + 1) },
                |v| *v >= 3,
            )
            .await
            .unwrap();
            assert!(waited.satisfied);
            assert_eq!(waited.value, 3);
        }

        #[tokio::test]
        async fn test_timeout_reports_last_value() {
            let waited = wait_for(&fast(), || async { Ok("2 items left") }, |v| {
                *v == "1 item left"
            })
            .await
            .unwrap();
            assert!(!waited.satisfied);
            assert_eq!(waited.value, "2 items left");
            assert!(waited.elapsed >= Duration::from_millis(100));
        }

        #[tokio::test]
        async fn test_probe_error_stops_waiting() {
            let calls = AtomicUsize::new(0);
            let result: ProbeResult<Waited<u32>> = wait_for(
                &fast(),
                || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async { Err(ProbeError::script("page crashed")) }
                },
                |_| true,
            )
            .await;
            assert!(matches!(result, Err(ProbeError::Script { .. })));
            assert_eq!(calls.load(Ordering::SeqCst), 1);
        }

        #[tokio::test]
        async fn test_wait_for_element_found() {
            let found = wait_for_element(&fast(), ".toggle-all", || async { Ok(Some(7)) })
                .await
                .unwrap();
            assert_eq!(found, 7);
        }

        #[tokio::test]
        async fn test_wait_for_element_missing() {
            let err = wait_for_element::<u8, _, _>(&fast(), ".toggle-all", || async { Ok(None) })
                .await
                .unwrap_err();
            match err {
                ProbeError::ElementNotFound { selector, waited_ms } => {
                    assert_eq!(selector, ".toggle-all");
                    assert!(waited_ms >= 100);
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }
}
