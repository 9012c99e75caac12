use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::dates;

use super::store::UsageStore;

/// Fresh requests granted per elapsed week of the current month.
pub const WEEKLY_ALLOWANCE: u32 = 10;
/// Hard ceiling on estimated spend per month, in dollars.
pub const MONTHLY_COST_CAP: f64 = 10.0;

/// Usage counters for one calendar month, US Eastern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageState {
    pub requests_this_month: u32,
    pub last_reset: DateTime<Utc>,
    pub estimated_cost: f64,
}

impl UsageState {
    pub fn fresh(now: DateTime<Utc>) -> Self {
        Self {
            requests_this_month: 0,
            last_reset: now,
            estimated_cost: 0.0,
        }
    }
}

/// Verdict for a single insight request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestBudget {
    pub allowed: bool,
    pub reason: Option<String>,
}

impl RequestBudget {
    fn allowed() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    fn denied(reason: String) -> Self {
        Self {
            allowed: false,
            reason: Some(reason),
        }
    }
}

/// Gates insight generation behind a monthly budget that unlocks gradually.
///
/// The allowance grows by [`WEEKLY_ALLOWANCE`] per elapsed week of the
/// Eastern month, so a player cannot burn the whole month's budget on day
/// one. [`MONTHLY_COST_CAP`] backstops the count in dollars. Persistence is
/// soft: a store that fails to load or save is logged and the limiter keeps
/// counting in memory.
pub struct InsightLimiter {
    store: Box<dyn UsageStore>,
    state: UsageState,
}

impl InsightLimiter {
    pub fn open(store: Box<dyn UsageStore>) -> Self {
        let state = match store.load() {
            Ok(Some(state)) => state,
            Ok(None) => UsageState::fresh(Utc::now()),
            Err(err) => {
                warn!(error = %err, "could not load insight usage, starting fresh");
                UsageState::fresh(Utc::now())
            }
        };
        Self { store, state }
    }

    /// Whether one more insight request fits the current budget.
    pub fn check(&mut self) -> RequestBudget {
        self.check_at(Utc::now())
    }

    fn check_at(&mut self, now: DateTime<Utc>) -> RequestBudget {
        let today = dates::eastern_date(now);
        self.roll_month(today, now);

        if self.state.estimated_cost >= MONTHLY_COST_CAP {
            return RequestBudget::denied(format!(
                "monthly cost cap of ${MONTHLY_COST_CAP:.2} reached (${:.2} estimated)",
                self.state.estimated_cost
            ));
        }

        let allowance = WEEKLY_ALLOWANCE * weeks_elapsed(today);
        if self.state.requests_this_month >= allowance {
            return RequestBudget::denied(format!(
                "{} of {} insight requests used this month",
                self.state.requests_this_month, allowance
            ));
        }

        RequestBudget::allowed()
    }

    /// Counts one completed request and its estimated cost.
    pub fn record(&mut self, cost: f64) {
        self.state.requests_this_month += 1;
        self.state.estimated_cost += cost;
        self.persist();
    }

    pub fn usage(&self) -> &UsageState {
        &self.state
    }

    fn roll_month(&mut self, today: NaiveDate, now: DateTime<Utc>) {
        let reset_day = dates::eastern_date(self.state.last_reset);
        if (reset_day.year(), reset_day.month()) != (today.year(), today.month()) {
            self.state = UsageState::fresh(now);
            self.persist();
        }
    }

    fn persist(&self) {
        if let Err(err) = self.store.save(&self.state) {
            warn!(error = %err, "could not persist insight usage");
        }
    }
}

/// Week-of-month count, starting at 1 on the 1st and reaching 4 by the 28th.
fn weeks_elapsed(today: NaiveDate) -> u32 {
    (today.day() / 7).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Result;
    use crate::insights::store::{JsonFileStore, MemoryStore};
    use std::sync::Arc;

    /// Handle into a shared in-memory store so tests can reopen it.
    struct SharedStore(Arc<MemoryStore>);

    impl UsageStore for SharedStore {
        fn load(&self) -> Result<Option<UsageState>> {
            self.0.load()
        }

        fn save(&self, state: &UsageState) -> Result<()> {
            self.0.save(state)
        }
    }

    struct BrokenStore;

    impl UsageStore for BrokenStore {
        fn load(&self) -> Result<Option<UsageState>> {
            Err(std::io::Error::other("store offline").into())
        }

        fn save(&self, _state: &UsageState) -> Result<()> {
            Err(std::io::Error::other("store offline").into())
        }
    }

    fn utc(raw: &str) -> DateTime<Utc> {
        raw.parse().unwrap()
    }

    fn limiter_with(state: UsageState) -> InsightLimiter {
        InsightLimiter::open(Box::new(MemoryStore::with_state(state)))
    }

    #[test]
    fn test_weeks_elapsed_steps_through_the_month() {
        let day = |d| NaiveDate::from_ymd_opt(2026, 1, d).unwrap();
        assert_eq!(weeks_elapsed(day(1)), 1);
        assert_eq!(weeks_elapsed(day(6)), 1);
        assert_eq!(weeks_elapsed(day(7)), 1);
        assert_eq!(weeks_elapsed(day(14)), 2);
        assert_eq!(weeks_elapsed(day(21)), 3);
        assert_eq!(weeks_elapsed(day(28)), 4);
        assert_eq!(weeks_elapsed(day(31)), 4);
    }

    #[test]
    fn test_first_week_allows_exactly_ten_requests() {
        // Jan 10 Eastern sits in week one, so the allowance is 10.
        let now = utc("2026-01-10T12:00:00Z");
        let mut limiter = limiter_with(UsageState::fresh(now));

        for _ in 0..10 {
            assert!(limiter.check_at(now).allowed);
            limiter.record(0.01);
        }

        let verdict = limiter.check_at(now);
        assert!(!verdict.allowed);
        assert!(verdict.reason.unwrap().contains("10 of 10"));
    }

    #[test]
    fn test_allowance_grows_with_elapsed_weeks() {
        let now = utc("2026-01-21T12:00:00Z");
        let mut state = UsageState::fresh(now);
        state.requests_this_month = 29;
        let mut limiter = limiter_with(state);

        assert!(limiter.check_at(now).allowed);

        limiter.record(0.01);
        let verdict = limiter.check_at(now);
        assert!(!verdict.allowed);
        assert!(verdict.reason.unwrap().contains("30 of 30"));
    }

    #[test]
    fn test_cost_cap_denies_even_with_requests_left() {
        let now = utc("2026-01-28T12:00:00Z");
        let mut state = UsageState::fresh(now);
        state.requests_this_month = 2;
        state.estimated_cost = 10.0;
        let mut limiter = limiter_with(state);

        let verdict = limiter.check_at(now);
        assert!(!verdict.allowed);
        assert!(verdict.reason.unwrap().contains("$10.00"));
    }

    #[test]
    fn test_new_month_resets_counters() {
        let january = utc("2026-01-30T12:00:00Z");
        let mut state = UsageState::fresh(january);
        state.requests_this_month = 40;
        state.estimated_cost = 9.5;
        let mut limiter = limiter_with(state);

        let february = utc("2026-02-02T12:00:00Z");
        assert!(limiter.check_at(february).allowed);
        assert_eq!(limiter.usage().requests_this_month, 0);
        assert_eq!(limiter.usage().estimated_cost, 0.0);
    }

    #[test]
    fn test_month_boundary_follows_eastern_time() {
        // 2026-02-01 02:00 UTC is still Jan 31 in the Eastern zone, so a
        // check later in February must treat it as last month and reset.
        let late_january = utc("2026-02-01T02:00:00Z");
        let mut state = UsageState::fresh(late_january);
        state.requests_this_month = 12;
        let mut limiter = limiter_with(state);

        limiter.check_at(utc("2026-02-10T12:00:00Z"));
        assert_eq!(limiter.usage().requests_this_month, 0);
    }

    #[test]
    fn test_record_persists_across_reopen() {
        let shared = Arc::new(MemoryStore::new());
        let now = utc("2026-01-10T12:00:00Z");

        let mut limiter = InsightLimiter::open(Box::new(SharedStore(Arc::clone(&shared))));
        limiter.check_at(now);
        limiter.record(0.01);
        limiter.record(0.01);

        let reopened = InsightLimiter::open(Box::new(SharedStore(shared)));
        assert_eq!(reopened.usage().requests_this_month, 2);
        assert!((reopened.usage().estimated_cost - 0.02).abs() < 1e-9);
    }

    #[test]
    fn test_broken_store_still_counts_in_memory() {
        let now = utc("2026-01-10T12:00:00Z");
        let mut limiter = InsightLimiter::open(Box::new(BrokenStore));

        assert!(limiter.check_at(now).allowed);
        limiter.record(0.01);
        assert_eq!(limiter.usage().requests_this_month, 1);
    }

    #[test]
    fn test_open_survives_corrupt_usage_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("usage.json");
        std::fs::write(&path, "{ definitely not json").unwrap();

        let limiter = InsightLimiter::open(Box::new(JsonFileStore::new(path)));
        assert_eq!(limiter.usage().requests_this_month, 0);
    }
}
