use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{Duration, NaiveDate};
use rand::Rng;

use prep_core::model::{ProgressEntry, WeeklyBucket};
use prep_core::stats;
use prep_core::time::Clock;
use storage::{KeyValueStore, keys};

use crate::subject::{Subject, SubscriptionId};

/// Owns the per-day activity series and mirrors it to persistence.
///
/// The series holds at most one entry per calendar date and is only ever
/// upserted by date key, never deleted from. Mutations follow the same
/// write-then-publish ordering as the question store.
#[derive(Clone)]
pub struct ProgressStore {
    clock: Clock,
    kv: Arc<dyn KeyValueStore>,
    series: Subject<Vec<ProgressEntry>>,
    degraded: Arc<AtomicBool>,
}

impl ProgressStore {
    /// Build the store, restoring the persisted series or seeding demo data.
    ///
    /// First run seeds 30 consecutive days ending today with random activity;
    /// a corrupt persisted snapshot is discarded the same way.
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>, clock: Clock) -> Self {
        let degraded = Arc::new(AtomicBool::new(false));
        let initial = load_or_seed(kv.as_ref(), &degraded, clock.today());
        Self {
            clock,
            kv,
            series: Subject::new(initial),
            degraded,
        }
    }

    /// Registers a subscriber; it immediately receives the current series.
    pub fn subscribe(
        &self,
        callback: impl Fn(&Vec<ProgressEntry>) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.series.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.series.unsubscribe(id);
    }

    /// The current full series.
    #[must_use]
    pub fn snapshot(&self) -> Vec<ProgressEntry> {
        self.series.latest()
    }

    /// Upserts the entry keyed by today's date.
    pub fn record_today(&self, questions_completed: u32, time_spent: u32) {
        let today = self.clock.today();
        let mut entries = self.series.latest();
        let entry = ProgressEntry::new(today, questions_completed, time_spent);
        match entries.iter_mut().find(|e| e.date == today) {
            Some(existing) => *existing = entry,
            None => entries.push(entry),
        }
        self.commit(entries);
    }

    /// Consecutive days with completions, ending today; 0 if today is missing.
    #[must_use]
    pub fn current_streak(&self) -> u32 {
        stats::current_streak(&self.series.latest(), self.clock.today())
    }

    /// Total minutes recorded across the whole series.
    #[must_use]
    pub fn total_time_spent(&self) -> u32 {
        stats::total_time_spent(&self.series.latest())
    }

    /// Completions summed into Sunday-starting weekly buckets.
    #[must_use]
    pub fn weekly_rollup(&self) -> Vec<WeeklyBucket> {
        stats::weekly_rollup(&self.series.latest())
    }

    /// True once a persistence write has failed this session.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::Relaxed)
    }

    fn commit(&self, entries: Vec<ProgressEntry>) {
        persist(self.kv.as_ref(), &self.degraded, &entries);
        tracing::debug!(days = entries.len(), "progress series updated");
        self.series.publish(entries);
    }
}

fn load_or_seed(kv: &dyn KeyValueStore, degraded: &AtomicBool, today: NaiveDate) -> Vec<ProgressEntry> {
    match kv.read(keys::PROGRESS) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(entries) => return entries,
            Err(e) => {
                tracing::warn!(error = %e, "persisted progress is corrupt, reseeding demo data");
            }
        },
        Ok(None) => {}
        Err(e) => {
            tracing::warn!(error = %e, "progress read failed, running memory-only");
            degraded.store(true, Ordering::Relaxed);
            return demo_series(today);
        }
    }

    let seeded = demo_series(today);
    persist(kv, degraded, &seeded);
    seeded
}

fn persist(kv: &dyn KeyValueStore, degraded: &AtomicBool, entries: &[ProgressEntry]) {
    match serde_json::to_string(entries) {
        Ok(encoded) => {
            if let Err(e) = kv.write(keys::PROGRESS, &encoded) {
                tracing::warn!(error = %e, "progress write failed, continuing memory-only");
                degraded.store(true, Ordering::Relaxed);
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "progress encode failed");
            degraded.store(true, Ordering::Relaxed);
        }
    }
}

/// Synthetic activity for the 30 consecutive days ending `today`.
fn demo_series(today: NaiveDate) -> Vec<ProgressEntry> {
    let mut rng = rand::rng();
    (0..30)
        .rev()
        .map(|days_ago| {
            ProgressEntry::new(
                today - Duration::days(days_ago),
                rng.random_range(0..=4),
                rng.random_range(30..=150),
            )
        })
        .collect()
}
