//! Retry with deterministic exponential backoff.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use super::error::{BriqError, ErrorKind};

/// Exponential backoff without jitter: `min(base * factor^(attempt-1), max)`.
///
/// `factor` must be at least 1; [`RetryPolicy::new`] rejects anything lower.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub factor: u32,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(10_000),
            factor: 2,
        }
    }
}

impl Backoff {
    /// Delay to wait after the `attempt`-th failure (1-based; `0` is treated as `1`).
    pub fn delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.max(1) - 1;
        let multiplier = self.factor.saturating_pow(exponent);
        self.base_delay
            .saturating_mul(multiplier)
            .min(self.max_delay)
    }
}

/// Free-function form of [`Backoff::delay`].
pub fn backoff_delay(attempt: u32, base_delay: Duration, max_delay: Duration, factor: u32) -> Duration {
    Backoff {
        base_delay,
        max_delay,
        factor,
    }
    .delay(attempt)
}

/// Whether an error is worth another attempt.
///
/// Network failures and timeouts always are. Otherwise only errors carrying a
/// status of 429 or >= 500 qualify.
pub fn is_retryable(error: &BriqError) -> bool {
    match error.kind() {
        ErrorKind::Network | ErrorKind::Timeout => true,
        _ => matches!(error.status_code(), Some(status) if status >= 500 || status == 429),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Bounded retry policy: at most `max_attempts` attempts in total.
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Backoff,
}

impl RetryPolicy {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

    /// Create a policy. Zero attempts or a backoff factor below 1 is a configuration error.
    pub fn new(max_attempts: u32, backoff: Backoff) -> Result<Self, BriqError> {
        if max_attempts == 0 {
            return Err(BriqError::configuration(
                "max attempts must be at least 1",
            ));
        }
        if backoff.factor == 0 {
            return Err(BriqError::configuration(
                "backoff factor must be at least 1",
            ));
        }
        Ok(Self {
            max_attempts,
            backoff,
        })
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn backoff(&self) -> Backoff {
        self.backoff
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            backoff: Backoff::default(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
/// Diagnostic events emitted by [`run_with_retry`].
pub enum RetryEvent<'a> {
    /// Attempt `attempt` failed with a retryable error; sleeping `delay` before the next one.
    Retrying {
        request: &'a str,
        attempt: u32,
        delay: Duration,
        error: &'a BriqError,
    },
    /// Attempt `attempt` failed with an error that retrying cannot fix.
    NotRetryable {
        request: &'a str,
        attempt: u32,
        error: &'a BriqError,
    },
    /// Every allowed attempt failed; `error` is the last one.
    Exhausted {
        request: &'a str,
        attempts: u32,
        error: &'a BriqError,
    },
}

/// Callback receiving [`RetryEvent`]s, in addition to the `tracing` output.
pub type RetryObserver = Arc<dyn Fn(&RetryEvent<'_>) + Send + Sync>;

fn emit(observer: Option<&RetryObserver>, event: RetryEvent<'_>) {
    match &event {
        RetryEvent::Retrying {
            request,
            attempt,
            delay,
            error,
        } => tracing::warn!(
            request,
            attempt,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            code = error.code(),
            %error,
            "request failed, retrying"
        ),
        RetryEvent::NotRetryable {
            request,
            attempt,
            error,
        } => tracing::info!(
            request,
            attempt,
            code = error.code(),
            %error,
            "error is not retryable, failing immediately"
        ),
        RetryEvent::Exhausted {
            request,
            attempts,
            error,
        } => tracing::error!(
            request,
            attempts,
            code = error.code(),
            %error,
            "all retry attempts exhausted"
        ),
    }

    if let Some(observer) = observer {
        observer(&event);
    }
}

/// Run `attempt_fn` until it succeeds, fails with a non-retryable error, or the policy
/// runs out of attempts. The error returned is always the one from the last attempt.
///
/// `attempt_fn` receives the 1-based attempt number. `request` is a label used only for
/// diagnostics.
pub async fn run_with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    observer: Option<&RetryObserver>,
    request: &str,
    mut attempt_fn: F,
) -> Result<T, BriqError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, BriqError>>,
{
    let mut attempt = 1u32;
    loop {
        let error = match attempt_fn(attempt).await {
            Ok(value) => return Ok(value),
            Err(error) => error,
        };

        if attempt >= policy.max_attempts {
            emit(
                observer,
                RetryEvent::Exhausted {
                    request,
                    attempts: attempt,
                    error: &error,
                },
            );
            return Err(error);
        }
        if !is_retryable(&error) {
            emit(
                observer,
                RetryEvent::NotRetryable {
                    request,
                    attempt,
                    error: &error,
                },
            );
            return Err(error);
        }

        let delay = policy.backoff.delay(attempt);
        emit(
            observer,
            RetryEvent::Retrying {
                request,
                attempt,
                delay,
                error: &error,
            },
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn network_error() -> BriqError {
        BriqError::network("Network request failed", &"connection reset")
    }

    fn server_error(status: u16) -> BriqError {
        BriqError::Server {
            message: format!("HTTP {status} error"),
            status,
            details: None,
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Seen {
        Retrying(u32, Duration),
        NotRetryable(u32),
        Exhausted(u32, &'static str),
    }

    fn recording_observer() -> (RetryObserver, Arc<Mutex<Vec<Seen>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let observer: RetryObserver = Arc::new(move |event: &RetryEvent<'_>| {
            let entry = match event {
                RetryEvent::Retrying { attempt, delay, .. } => Seen::Retrying(*attempt, *delay),
                RetryEvent::NotRetryable { attempt, .. } => Seen::NotRetryable(*attempt),
                RetryEvent::Exhausted {
                    attempts, error, ..
                } => Seen::Exhausted(*attempts, error.code()),
            };
            sink.lock().unwrap().push(entry);
        });
        (observer, seen)
    }

    #[test]
    fn backoff_matches_reference_values() {
        let backoff = Backoff::default();
        assert_eq!(backoff.delay(1), ms(1000));
        assert_eq!(backoff.delay(2), ms(2000));
        assert_eq!(backoff.delay(3), ms(4000));
        assert_eq!(backoff.delay(4), ms(8000));
        assert_eq!(backoff.delay(5), ms(10_000));
        assert_eq!(backoff_delay(1, ms(1000), ms(10_000), 2), ms(1000));
        assert_eq!(backoff_delay(5, ms(1000), ms(10_000), 2), ms(10_000));
    }

    #[test]
    fn backoff_is_monotonic_and_capped() {
        let backoff = Backoff::default();
        let mut previous = Duration::ZERO;
        for attempt in 0..=64 {
            let delay = backoff.delay(attempt);
            assert!(delay >= previous, "attempt {attempt}");
            assert!(delay <= backoff.max_delay, "attempt {attempt}");
            previous = delay;
        }
        assert_eq!(backoff.delay(0), backoff.delay(1));
    }

    #[test]
    fn classifier_retries_transient_failures_only() {
        assert!(is_retryable(&network_error()));
        assert!(is_retryable(&BriqError::Timeout { timeout: ms(5000) }));
        assert!(is_retryable(&server_error(503)));
        assert!(is_retryable(&server_error(501)));
        assert!(is_retryable(&BriqError::RateLimit {
            message: "slow down".to_owned(),
            retry_after: None,
        }));

        assert!(!is_retryable(&BriqError::validation("bad input")));
        assert!(!is_retryable(&BriqError::Authentication {
            message: "bad key".to_owned(),
            details: None,
        }));
        assert!(!is_retryable(&BriqError::not_found("Resource", None)));
        assert!(!is_retryable(&BriqError::configuration("bad config")));
        assert!(!is_retryable(&server_error(418)));
    }

    #[test]
    fn zero_attempts_is_a_configuration_error() {
        let err = RetryPolicy::new(0, Backoff::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(RetryPolicy::new(1, Backoff::default()).unwrap().max_attempts(), 1);
    }

    #[test]
    fn zero_backoff_factor_is_a_configuration_error() {
        let backoff = Backoff {
            factor: 0,
            ..Backoff::default()
        };
        let err = RetryPolicy::new(3, backoff).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(err.to_string(), "backoff factor must be at least 1");

        let flat = Backoff {
            factor: 1,
            ..Backoff::default()
        };
        let policy = RetryPolicy::new(3, flat).unwrap();
        assert_eq!(policy.backoff().delay(1), ms(1000));
        assert_eq!(policy.backoff().delay(4), ms(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_after_two_retryable_failures() {
        let policy = RetryPolicy::default();
        let (observer, seen) = recording_observer();
        let calls = AtomicU32::new(0);

        let started = tokio::time::Instant::now();
        let result = run_with_retry(&policy, Some(&observer), "GET workspace/all/", |attempt| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt < 3 {
                    Err(network_error())
                } else {
                    Ok(attempt)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![Seen::Retrying(1, ms(1000)), Seen::Retrying(2, ms(2000))]
        );
        assert!(started.elapsed() >= ms(3000));
    }

    #[tokio::test(start_paused = true)]
    async fn non_retryable_error_fails_on_first_attempt() {
        let policy = RetryPolicy::default();
        let (observer, seen) = recording_observer();
        let calls = AtomicU32::new(0);

        let started = tokio::time::Instant::now();
        let result: Result<(), _> = run_with_retry(&policy, Some(&observer), "POST x", |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(BriqError::validation("bad input")) }
        })
        .await;

        assert_eq!(result.unwrap_err().kind(), ErrorKind::Validation);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(*seen.lock().unwrap(), vec![Seen::NotRetryable(1)]);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn exhaustion_surfaces_the_last_error() {
        let policy = RetryPolicy::new(3, Backoff::default()).unwrap();
        let (observer, seen) = recording_observer();

        let result: Result<(), _> = run_with_retry(&policy, Some(&observer), "GET x", |attempt| async move {
            match attempt {
                1 => Err(network_error()),
                2 => Err(BriqError::Timeout { timeout: ms(5000) }),
                _ => Err(server_error(503)),
            }
        })
        .await;

        let err = result.unwrap_err();
        assert_eq!(err.status_code(), Some(503));
        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                Seen::Retrying(1, ms(1000)),
                Seen::Retrying(2, ms(2000)),
                Seen::Exhausted(3, "SERVER_ERROR"),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn single_attempt_policy_never_sleeps() {
        let policy = RetryPolicy::new(1, Backoff::default()).unwrap();
        let calls = AtomicU32::new(0);

        let result: Result<(), _> = run_with_retry(&policy, None, "GET x", |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(network_error()) }
        })
        .await;

        assert_eq!(result.unwrap_err().kind(), ErrorKind::Network);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
