//! Poll-until-condition primitives.
//!
//! Remote resources (clusters, node pools, Kubernetes API servers) move
//! through states on their own schedule. Waiting for one of them is always
//! the same loop: fetch, classify, and either stop or sleep and try again.
//!
//! - A **probe** fetches the current state and classifies it into a
//!   [`PollOutcome`].
//! - [`poll_immediate`] runs the probe right away and then once per
//!   interval until it is `Ready`, `Fatal`, or the timeout elapses.
//!
//! # Invariants
//!
//! - The first probe happens immediately, without waiting an interval
//! - A `Fatal` outcome stops polling on that attempt; nothing is retried
//! - Consecutive probes start no more than one interval apart
//! - The timeout bounds the whole wait, including a probe that hangs

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Polling errors.
#[derive(Debug, Error)]
pub enum PollError<E> {
    /// The condition was not met before the timeout.
    #[error("timeout after {elapsed:?} waiting for {resource}")]
    Timeout { resource: String, elapsed: Duration },

    /// The probe reported a state it can't recover from.
    #[error(transparent)]
    Fatal(E),
}

impl<E> PollError<E> {
    /// Returns true if the wait ran out of time.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Result of a single probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome<E> {
    /// Condition not met yet; keep polling.
    Pending,

    /// Condition met; stop polling.
    Ready,

    /// Unexpected state; stop polling and report the error.
    Fatal(E),
}

impl<E> PollOutcome<E> {
    /// Returns true if the condition has been met.
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    /// Returns true if polling should continue.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns true if polling should stop with an error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal(_))
    }
}

impl<E> From<bool> for PollOutcome<E> {
    fn from(ready: bool) -> Self {
        if ready {
            Self::Ready
        } else {
            Self::Pending
        }
    }
}

/// Interval and timeout for one wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Time between the start of consecutive probes.
    pub interval: Duration,

    /// Maximum time to wait for the condition.
    pub timeout: Duration,
}

impl PollConfig {
    /// Create a new poll config.
    pub const fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL, DEFAULT_TIMEOUT)
    }
}

/// Poll `probe` until it reports [`PollOutcome::Ready`].
///
/// The probe runs immediately and then at every `config.interval` boundary.
/// A probe that takes longer than the interval delays the next one rather
/// than causing a burst of catch-up probes.
///
/// `resource` names what is being waited on; it appears in logs and in the
/// [`PollError::Timeout`] message.
pub async fn poll_immediate<F, Fut, E>(
    config: PollConfig,
    resource: impl Into<String>,
    mut probe: F,
) -> Result<(), PollError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = PollOutcome<E>>,
    E: std::fmt::Display,
{
    let resource = resource.into();
    let start = Instant::now();

    let mut ticker = tokio::time::interval(config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let attempts = async {
        let mut attempt = 0u32;
        loop {
            ticker.tick().await;
            attempt += 1;

            match probe().await {
                PollOutcome::Ready => {
                    info!(
                        resource = %resource,
                        attempt,
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "Condition met"
                    );
                    return Ok(());
                }
                PollOutcome::Pending => {
                    debug!(resource = %resource, attempt, "Condition not yet met");
                }
                PollOutcome::Fatal(e) => {
                    warn!(resource = %resource, attempt, error = %e, "Polling aborted");
                    return Err(PollError::Fatal(e));
                }
            }
        }
    };

    let waited = tokio::time::timeout(config.timeout, attempts).await;
    match waited {
        Ok(result) => result,
        Err(_) => {
            let elapsed = start.elapsed();
            warn!(
                resource = %resource,
                elapsed_ms = elapsed.as_millis() as u64,
                "Timed out waiting for condition"
            );
            Err(PollError::Timeout { resource, elapsed })
        }
    }
}

/// Default interval between probes.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Default upper bound for a single wait.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15 * 60); // 15 minutes

/// Probe interval while waiting for a freshly created cluster to attach.
pub const CLUSTER_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Upper bound for a freshly created cluster to attach.
pub const CLUSTER_TIMEOUT: Duration = Duration::from_secs(20 * 60); // 20 minutes
