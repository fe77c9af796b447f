//! Run-scoped sync statistics.
//!
//! Counters are atomics so every record of a batch can update them while
//! the batch runs concurrently. They only ever grow.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct SyncStatistics {
    resource_plural: &'static str,
    processed: AtomicU64,
    created: AtomicU64,
    updated: AtomicU64,
    failed: AtomicU64,
    started_at: DateTime<Utc>,
    started: Instant,
    elapsed: Mutex<Option<Duration>>,
}

/// Plain copy of the counters, for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatisticsSnapshot {
    pub processed: u64,
    pub created: u64,
    pub updated: u64,
    pub failed: u64,
    pub unchanged: u64,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
}

impl SyncStatistics {
    /// Starts the clock. `resource_plural` names the entities in the
    /// summary, e.g. `"products"`.
    pub fn new(resource_plural: &'static str) -> Self {
        Self {
            resource_plural,
            processed: AtomicU64::new(0),
            created: AtomicU64::new(0),
            updated: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            started_at: Utc::now(),
            started: Instant::now(),
            elapsed: Mutex::new(None),
        }
    }

    pub fn increment_processed(&self, count: u64) {
        self.processed.fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_created(&self) {
        self.created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_updated(&self) {
        self.updated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_failed(&self, count: u64) {
        self.failed.fetch_add(count, Ordering::Relaxed);
    }

    pub fn processed(&self) -> u64 {
        self.processed.load(Ordering::Relaxed)
    }

    pub fn created(&self) -> u64 {
        self.created.load(Ordering::Relaxed)
    }

    pub fn updated(&self) -> u64 {
        self.updated.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    /// Processed records that were neither created, updated nor failed:
    /// already in sync, skipped by a hook, or rejected by validation.
    pub fn unchanged(&self) -> u64 {
        self.processed()
            .saturating_sub(self.created())
            .saturating_sub(self.updated())
            .saturating_sub(self.failed())
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Stops the clock. Later calls keep the first measurement.
    pub fn finish(&self) {
        if let Ok(mut elapsed) = self.elapsed.lock() {
            elapsed.get_or_insert_with(|| self.started.elapsed());
        }
    }

    /// Time from creation until [`SyncStatistics::finish`], or until now
    /// while the run is still going.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
            .lock()
            .ok()
            .and_then(|elapsed| *elapsed)
            .unwrap_or_else(|| self.started.elapsed())
    }

    pub fn report_message(&self) -> String {
        format!(
            "Summary: {} {} were processed in total ({} created, {} updated and {} failed to sync).",
            self.processed(),
            self.resource_plural,
            self.created(),
            self.updated(),
            self.failed()
        )
    }

    pub fn snapshot(&self) -> StatisticsSnapshot {
        StatisticsSnapshot {
            processed: self.processed(),
            created: self.created(),
            updated: self.updated(),
            failed: self.failed(),
            unchanged: self.unchanged(),
            started_at: self.started_at,
            elapsed_ms: u64::try_from(self.elapsed().as_millis()).unwrap_or(u64::MAX),
        }
    }
}
