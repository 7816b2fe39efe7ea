//! Start-up polling: wait until an address answers before issuing requests.

use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use reqwest::Client;
use tracing::{info, warn};

use crate::config::consts::POLL_INTERVAL_SECS;
use crate::retry::{retry, RetryConfig};

/// What the poller observed. Exhaustion is not an error; callers that need to
/// distinguish it from success inspect the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Up { attempts: u32 },
    Exhausted { attempts: u32 },
}

impl PollOutcome {
    pub fn is_up(&self) -> bool {
        matches!(self, PollOutcome::Up { .. })
    }

    pub fn attempts(&self) -> u32 {
        match self {
            PollOutcome::Up { attempts } | PollOutcome::Exhausted { attempts } => *attempts,
        }
    }
}

/// Run `probe` up to `max_retries` times, `interval` apart, stopping at the
/// first success.
pub async fn poll_until_up<F, Fut, E>(
    addr: &str,
    max_retries: u32,
    interval: Duration,
    probe: F,
) -> PollOutcome
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<(), E>>,
    E: std::fmt::Display,
{
    // A zero limit would mean "forever" to the retry helper.
    if max_retries == 0 {
        return PollOutcome::Exhausted { attempts: 0 };
    }

    let attempts = AtomicU32::new(0);
    let result = retry(
        RetryConfig::fixed_duration(interval, max_retries),
        "poll_for_start",
        || {
            attempts.fetch_add(1, Ordering::SeqCst);
            probe()
        },
    )
    .await;
    let attempts = attempts.load(Ordering::SeqCst);

    match result {
        Ok(()) => {
            info!(addr, attempts, "{addr} is up. Starting...");
            PollOutcome::Up { attempts }
        }
        Err(e) => {
            warn!(addr, attempts, error = %e, "{addr} did not come up, giving up");
            PollOutcome::Exhausted { attempts }
        }
    }
}

/// Probe `addr` over HTTP every [`POLL_INTERVAL_SECS`] seconds. Any response,
/// whatever its status code, counts as up.
pub async fn poll_for_start(addr: &str, max_retries: u32) -> PollOutcome {
    poll_for_start_with(
        &Client::new(),
        addr,
        max_retries,
        Duration::from_secs(POLL_INTERVAL_SECS),
    )
    .await
}

pub async fn poll_for_start_with(
    client: &Client,
    addr: &str,
    max_retries: u32,
    interval: Duration,
) -> PollOutcome {
    poll_until_up(addr, max_retries, interval, move || async move {
        client.get(addr).send().await.map(|_| ())
    })
    .await
}
