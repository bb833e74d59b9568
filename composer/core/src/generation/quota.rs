//! Per-Model Quota Cooldown Tracking
//!
//! Keeps the timestamp of each model's last quota-exhaustion event and
//! decides whether a model is currently usable. A model enters cooldown when
//! a quota failure is recorded and leaves it once the cooldown window has
//! elapsed. Entries are evicted lazily: the map is never swept, a stale
//! entry is removed by whichever availability check first observes it.
//!
//! Every operation has an explicit-`now` variant so tests can drive the
//! clock without sleeping.
//!
//! # Thread Safety
//!
//! The map sits behind a single mutex, which makes each check an atomic
//! read-and-possibly-evict. The engine is single-flight today, but nothing
//! here breaks if two orchestration calls ever race on the same entry.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Tracks which models are cooling down after quota exhaustion
pub struct QuotaTracker {
    /// Cooldown window applied after every quota hit
    window: Duration,

    /// Model -> instant of its last recorded quota exhaustion
    exhausted: Mutex<HashMap<String, Instant>>,
}

impl QuotaTracker {
    /// Create a tracker with the given cooldown window
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            exhausted: Mutex::new(HashMap::new()),
        }
    }

    /// The configured cooldown window
    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Mark a model as quota-exhausted now
    pub fn record_exhaustion(&self, model: &str) {
        self.record_exhaustion_at(model, Instant::now());
    }

    /// Mark a model as quota-exhausted at `at`, overwriting any prior record
    pub fn record_exhaustion_at(&self, model: &str, at: Instant) {
        let mut exhausted = self.exhausted.lock();
        exhausted.insert(model.to_string(), at);
    }

    /// Whether a model is usable now
    pub fn is_available(&self, model: &str) -> bool {
        self.is_available_at(model, Instant::now())
    }

    /// Whether a model is usable at `now`.
    ///
    /// A stale entry (age >= window) is evicted as a side effect and the
    /// model reported available.
    pub fn is_available_at(&self, model: &str, now: Instant) -> bool {
        let mut exhausted = self.exhausted.lock();
        match exhausted.get(model) {
            None => true,
            Some(&hit) => {
                if now.saturating_duration_since(hit) >= self.window {
                    exhausted.remove(model);
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Remaining cooldown for a model, `None` if available
    pub fn remaining_cooldown(&self, model: &str) -> Option<Duration> {
        self.remaining_cooldown_at(model, Instant::now())
    }

    /// Remaining cooldown at `now`, evicting the entry if it is stale
    pub fn remaining_cooldown_at(&self, model: &str, now: Instant) -> Option<Duration> {
        let mut exhausted = self.exhausted.lock();
        let &hit = exhausted.get(model)?;
        let age = now.saturating_duration_since(hit);
        if age >= self.window {
            exhausted.remove(model);
            None
        } else {
            Some(self.window - age)
        }
    }

    /// Shortest remaining cooldown across all tracked models at `now`.
    ///
    /// `None` when nothing is cooling down. Used by the engine to size the
    /// wait when an entire pass was skipped.
    pub fn min_remaining_at(&self, now: Instant) -> Option<Duration> {
        let exhausted = self.exhausted.lock();
        exhausted
            .values()
            .map(|&hit| {
                let age = now.saturating_duration_since(hit);
                self.window.saturating_sub(age)
            })
            .min()
    }

    /// Number of models currently tracked (stale entries included until a
    /// check evicts them)
    #[must_use]
    pub fn tracked_count(&self) -> usize {
        self.exhausted.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_secs(60);

    #[test]
    fn test_untracked_model_is_available() {
        let tracker = QuotaTracker::new(WINDOW);
        assert!(tracker.is_available_at("m", Instant::now()));
        assert!(tracker.remaining_cooldown_at("m", Instant::now()).is_none());
    }

    #[test]
    fn test_cooldown_respected_across_window() {
        let tracker = QuotaTracker::new(WINDOW);
        let t0 = Instant::now();
        tracker.record_exhaustion_at("m", t0);

        // Inside the window: unavailable
        assert!(!tracker.is_available_at("m", t0));
        assert!(!tracker.is_available_at("m", t0 + Duration::from_secs(59)));

        // At the boundary and beyond: available again
        assert!(tracker.is_available_at("m", t0 + WINDOW));
    }

    #[test]
    fn test_remaining_cooldown_counts_down() {
        let tracker = QuotaTracker::new(WINDOW);
        let t0 = Instant::now();
        tracker.record_exhaustion_at("m", t0);

        assert_eq!(
            tracker.remaining_cooldown_at("m", t0 + Duration::from_secs(25)),
            Some(Duration::from_secs(35))
        );
        assert!(tracker
            .remaining_cooldown_at("m", t0 + Duration::from_secs(61))
            .is_none());
    }

    #[test]
    fn test_stale_entry_evicted_on_check() {
        let tracker = QuotaTracker::new(WINDOW);
        let t0 = Instant::now();
        tracker.record_exhaustion_at("m", t0);
        assert_eq!(tracker.tracked_count(), 1);

        assert!(tracker.is_available_at("m", t0 + WINDOW));
        assert_eq!(tracker.tracked_count(), 0);
    }

    #[test]
    fn test_record_overwrites_prior_timestamp() {
        let tracker = QuotaTracker::new(WINDOW);
        let t0 = Instant::now();
        tracker.record_exhaustion_at("m", t0);
        tracker.record_exhaustion_at("m", t0 + Duration::from_secs(50));

        // 70s after the first hit, but only 20s after the second
        assert!(!tracker.is_available_at("m", t0 + Duration::from_secs(70)));
        assert!(tracker.is_available_at("m", t0 + Duration::from_secs(110)));
    }

    #[test]
    fn test_min_remaining_picks_earliest_expiry() {
        let tracker = QuotaTracker::new(WINDOW);
        let t0 = Instant::now();
        tracker.record_exhaustion_at("a", t0);
        tracker.record_exhaustion_at("b", t0 + Duration::from_secs(30));

        let now = t0 + Duration::from_secs(40);
        // "a" has 20s left, "b" has 50s left
        assert_eq!(tracker.min_remaining_at(now), Some(Duration::from_secs(20)));
    }

    #[test]
    fn test_min_remaining_none_when_untracked() {
        let tracker = QuotaTracker::new(WINDOW);
        assert!(tracker.min_remaining_at(Instant::now()).is_none());
    }

    #[test]
    fn test_models_tracked_independently() {
        let tracker = QuotaTracker::new(WINDOW);
        let t0 = Instant::now();
        tracker.record_exhaustion_at("a", t0);

        assert!(!tracker.is_available_at("a", t0 + Duration::from_secs(1)));
        assert!(tracker.is_available_at("b", t0 + Duration::from_secs(1)));
    }
}
