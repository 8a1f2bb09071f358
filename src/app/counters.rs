//! Request counters for the cached `/click` endpoint.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use utoipa::ToSchema;

pub const CACHE_EXPIRATION: Duration = Duration::from_secs(30 * 60);

/// Counts every request and every cache-miss execution. Counters are
/// lock-free; only the cache timestamp sits behind a mutex.
#[derive(Debug)]
pub struct CacheCounters {
    requests: AtomicU64,
    executions: AtomicU64,
    cached_at: Mutex<Option<Instant>>,
    expiration: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CacheReport {
    pub requests: u64,
    pub cache_hits: u64,
    pub cache_hits_percentage: u64,
}

impl Default for CacheCounters {
    fn default() -> Self {
        Self::new(CACHE_EXPIRATION)
    }
}

impl CacheCounters {
    pub fn new(expiration: Duration) -> Self {
        Self {
            requests: AtomicU64::new(0),
            executions: AtomicU64::new(0),
            cached_at: Mutex::new(None),
            expiration,
        }
    }

    pub fn record_request(&self) -> u64 {
        self.requests.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn record_execution(&self) -> u64 {
        self.executions.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Counts one request and reports whether a fresh cached response exists.
    /// `refresh` bypasses the cache and leaves the stored entry untouched.
    /// On a plain miss the cache is re-armed.
    pub fn hit(&self, refresh: bool) -> bool {
        self.hit_at(refresh, Instant::now())
    }

    fn hit_at(&self, refresh: bool, now: Instant) -> bool {
        self.record_request();
        if refresh {
            return false;
        }
        let mut cached_at = match self.cached_at.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if matches!(*cached_at, Some(t) if now.duration_since(t) < self.expiration) {
            return true;
        }
        *cached_at = Some(now);
        false
    }

    pub fn report(&self) -> CacheReport {
        let requests = self.requests.load(Ordering::Relaxed);
        let executions = self.executions.load(Ordering::Relaxed);
        hit_report(requests, executions)
    }
}

/// Builds the report from raw counts. Zero requests yields a 0% ratio.
pub fn hit_report(requests: u64, executions: u64) -> CacheReport {
    let cache_hits = requests.saturating_sub(executions);
    let cache_hits_percentage = match requests {
        0 => 0,
        n => cache_hits * 100 / n,
    };
    CacheReport {
        requests,
        cache_hits,
        cache_hits_percentage,
    }
}
