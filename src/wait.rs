//! Explicit condition polling.
//!
//! Every "wait until the page shows X" in the workflow goes through
//! [`wait_until`], so budgets and poll cadence live in one place.

use serde::Deserialize;
use std::fmt;
use std::future::Future;
use std::time::{Duration, Instant};

const DEFAULT_TIMEOUT_MS: u64 = 4000;
const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}
fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

/// Wait budget shared by every condition check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct WaitConfig {
    /// Total time a condition may take before giving up.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Delay between two checks.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitConfig {
    pub fn new(timeout_ms: u64, poll_interval_ms: u64) -> Self {
        Self {
            timeout_ms,
            poll_interval_ms,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// The condition was still false when the budget ran out.
#[derive(Debug, Clone)]
pub struct WaitTimeout {
    /// How long we actually waited.
    pub elapsed: Duration,
    /// Last error the predicate returned, if its final check failed.
    pub last_error: Option<String>,
}

impl fmt::Display for WaitTimeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timed out after {}ms", self.elapsed.as_millis())?;
        if let Some(ref e) = self.last_error {
            write!(f, " ({})", e)?;
        }
        Ok(())
    }
}

impl std::error::Error for WaitTimeout {}

/// Poll `check` until it returns `Ok(true)` or the budget is spent.
///
/// An `Err` from `check` counts as "not yet": elements that are still being
/// rendered routinely fail lookups. The check always runs at least once.
pub async fn wait_until<F, Fut>(
    config: &WaitConfig,
    mut check: F,
) -> std::result::Result<(), WaitTimeout>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = crate::Result<bool>>,
{
    let start = Instant::now();
    let deadline = start + config.timeout();
    loop {
        let last_error = match check().await {
            Ok(true) => return Ok(()),
            Ok(false) => None,
            Err(e) => Some(e.to_string()),
        };

        let now = Instant::now();
        if now >= deadline {
            return Err(WaitTimeout {
                elapsed: now - start,
                last_error,
            });
        }
        let pause = config.poll_interval().min(deadline - now);
        tokio::time::sleep(pause).await;
    }
}
