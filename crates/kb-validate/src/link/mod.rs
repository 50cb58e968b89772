//! Link reachability checking.
//!
//! [`LinkChecker`] is the seam between the validators and the network. The
//! production implementation is [`HttpLinkChecker`]; tests substitute a
//! closure or a table-driven mock.

mod http;

use std::time::Duration;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

pub use http::{BROWSER_USER_AGENT, HttpLinkChecker, LinkError};

/// Outcome of checking one URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LinkStatus {
    /// 2xx, or 403 (the server exists but refuses automated clients).
    Reachable,
    /// Any other HTTP status.
    NotFound { code: u16 },
    /// Connection error or timeout.
    Unreachable { reason: String },
}

impl LinkStatus {
    pub fn is_reachable(&self) -> bool {
        matches!(self, Self::Reachable)
    }
}

/// Checks whether a URL is reachable.
pub trait LinkChecker: Sync {
    fn check(&self, url: &str) -> LinkStatus;
}

impl<F> LinkChecker for F
where
    F: Fn(&str) -> LinkStatus + Sync,
{
    fn check(&self, url: &str) -> LinkStatus {
        self(url)
    }
}

/// Worker pool and retry settings for link checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkCheckOptions {
    /// Concurrent checks; `1` checks sequentially.
    pub workers: usize,
    /// Additional attempts after a failed check.
    pub retries: u32,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Delay before the first retry; doubled for every further retry.
    pub backoff: Duration,
}

impl Default for LinkCheckOptions {
    fn default() -> Self {
        Self {
            workers: 4,
            retries: 0,
            timeout: Duration::from_secs(10),
            backoff: Duration::from_secs(1),
        }
    }
}

/// Check a URL, retrying failures with exponential backoff.
pub fn check_with_retries<C>(checker: &C, url: &str, options: &LinkCheckOptions) -> LinkStatus
where
    C: LinkChecker + ?Sized,
{
    let mut status = checker.check(url);
    let mut delay = options.backoff;
    for attempt in 1..=options.retries {
        if status.is_reachable() {
            break;
        }
        tracing::debug!(url, attempt, ?status, "retrying link check");
        std::thread::sleep(delay);
        delay = delay.saturating_mul(2);
        status = checker.check(url);
    }
    status
}

/// Check every URL, returning statuses in input order.
///
/// Runs on a dedicated pool of `options.workers` threads; falls back to
/// sequential checking for a single worker or when the pool cannot be built.
pub fn check_all<C>(checker: &C, urls: &[String], options: &LinkCheckOptions) -> Vec<LinkStatus>
where
    C: LinkChecker + ?Sized,
{
    let check = |url: &String| check_with_retries(checker, url, options);
    if options.workers <= 1 || urls.len() <= 1 {
        return urls.iter().map(check).collect();
    }

    match rayon::ThreadPoolBuilder::new()
        .num_threads(options.workers)
        .thread_name(|idx| format!("kb-link-{idx}"))
        .build()
    {
        Ok(pool) => pool.install(|| urls.par_iter().map(check).collect()),
        Err(error) => {
            tracing::warn!(%error, "link check pool unavailable, checking sequentially");
            urls.iter().map(check).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fast_options(workers: usize, retries: u32) -> LinkCheckOptions {
        LinkCheckOptions {
            workers,
            retries,
            backoff: Duration::ZERO,
            ..LinkCheckOptions::default()
        }
    }

    #[test]
    fn check_all_preserves_input_order() {
        let checker = |url: &str| {
            if url.ends_with("dead") {
                LinkStatus::NotFound { code: 404 }
            } else {
                LinkStatus::Reachable
            }
        };
        let urls: Vec<String> = (0..32)
            .map(|i| {
                if i % 3 == 0 {
                    format!("https://example.org/{i}/dead")
                } else {
                    format!("https://example.org/{i}")
                }
            })
            .collect();
        let statuses = check_all(&checker, &urls, &fast_options(4, 0));
        assert_eq!(statuses.len(), urls.len());
        for (i, status) in statuses.iter().enumerate() {
            assert_eq!(status.is_reachable(), i % 3 != 0, "url {i}");
        }
    }

    #[test]
    fn failures_are_retried_until_success() {
        let calls = AtomicUsize::new(0);
        let checker = |_: &str| {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                LinkStatus::Unreachable {
                    reason: "timed out".to_string(),
                }
            } else {
                LinkStatus::Reachable
            }
        };
        let status = check_with_retries(&checker, "https://example.org", &fast_options(1, 3));
        assert_eq!(status, LinkStatus::Reachable);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn retries_stop_at_the_configured_limit() {
        let calls = AtomicUsize::new(0);
        let checker = |_: &str| {
            calls.fetch_add(1, Ordering::SeqCst);
            LinkStatus::NotFound { code: 404 }
        };
        let status = check_with_retries(&checker, "https://example.org", &fast_options(1, 2));
        assert_eq!(status, LinkStatus::NotFound { code: 404 });
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
