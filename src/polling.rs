//! Periodic refresh of train positions
//!
//! [`PollingLoop`] owns the interval timer and fires one fetch per tick.
//! Every tick draws a number from a [`TickSequencer`]; only the response of
//! the most recently issued tick may publish, so a slow earlier request can
//! never overwrite newer data. [`LiveFeed`] holds the last good position set.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{DateTime, Duration, Utc};
use gloo_timers::callback::Interval;
use indexmap::IndexMap;

use crate::api::{LocationClient, LocationError};
use crate::constants::{POLL_INTERVAL_MS, STALE_AFTER_INTERVALS};
use crate::models::TrainPosition;

/// Time without a successful tick after which data counts as stale
#[must_use]
pub fn stale_limit() -> Duration {
    Duration::milliseconds(i64::from(POLL_INTERVAL_MS) * i64::from(STALE_AFTER_INTERVALS))
}

/// Anything that can produce the current set of train positions
#[allow(async_fn_in_trait)]
pub trait PositionFeed {
    async fn get_positions(&self) -> Result<Vec<TrainPosition>, LocationError>;
}

impl PositionFeed for LocationClient {
    async fn get_positions(&self) -> Result<Vec<TrainPosition>, LocationError> {
        LocationClient::get_positions(self).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Idle,
    Polling,
}

/// Result of one resolved tick
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    Published(Vec<TrainPosition>),
    Failed(LocationError),
    /// Response belonged to a superseded or cancelled tick
    Discarded { tick: u64, latest: u64 },
}

/// Issues monotonic tick numbers and decides which responses may publish
#[derive(Debug, Default)]
pub struct TickSequencer {
    issued: u64,
    cancelled_through: u64,
}

impl TickSequencer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next tick number
    pub fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    #[must_use]
    pub fn latest(&self) -> u64 {
        self.issued
    }

    /// Invalidate every tick issued so far
    pub fn cancel(&mut self) {
        self.cancelled_through = self.issued;
    }

    #[must_use]
    pub fn is_current(&self, tick: u64) -> bool {
        tick == self.issued && tick > self.cancelled_through
    }

    /// Classify the response of `tick`
    #[must_use]
    pub fn resolve(&self, tick: u64, result: Result<Vec<TrainPosition>, LocationError>) -> TickOutcome {
        if !self.is_current(tick) {
            return TickOutcome::Discarded { tick, latest: self.issued };
        }
        match result {
            Ok(positions) => TickOutcome::Published(positions),
            Err(e) => TickOutcome::Failed(e),
        }
    }
}

/// Collapse repeated ids, keeping the last occurrence at the first one's place
fn last_wins(positions: Vec<TrainPosition>) -> Vec<TrainPosition> {
    let mut by_id: IndexMap<String, TrainPosition> = IndexMap::with_capacity(positions.len());
    for position in positions {
        by_id.insert(position.id.clone(), position);
    }
    by_id.into_values().collect()
}

/// Last known good position set plus freshness bookkeeping
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiveFeed {
    positions: Vec<TrainPosition>,
    last_update: Option<DateTime<Utc>>,
    watching_since: Option<DateTime<Utc>>,
    consecutive_failures: u32,
}

impl LiveFeed {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty feed whose staleness is measured from `now` until the first update
    #[must_use]
    pub fn started_at(now: DateTime<Utc>) -> Self {
        Self {
            watching_since: Some(now),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn positions(&self) -> &[TrainPosition] {
        &self.positions
    }

    #[must_use]
    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update
    }

    #[must_use]
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    #[must_use]
    pub fn find(&self, id: &str) -> Option<&TrainPosition> {
        self.positions.iter().find(|p| p.id == id)
    }

    /// Fold a tick outcome into the feed; returns whether positions changed
    ///
    /// Failed and discarded ticks leave the positions untouched. Published
    /// sets keep one entry per id, the last one received.
    pub fn apply(&mut self, outcome: TickOutcome, now: DateTime<Utc>) -> bool {
        match outcome {
            TickOutcome::Published(positions) => {
                self.positions = last_wins(positions);
                self.last_update = Some(now);
                self.consecutive_failures = 0;
                true
            }
            TickOutcome::Failed(_) => {
                self.consecutive_failures += 1;
                false
            }
            TickOutcome::Discarded { .. } => false,
        }
    }

    /// Whether nothing has been published for at least `limit` as of `now`
    ///
    /// Before the first update the age counts from [`LiveFeed::started_at`].
    #[must_use]
    pub fn is_stale(&self, now: DateTime<Utc>, limit: Duration) -> bool {
        self.last_update
            .or(self.watching_since)
            .is_some_and(|since| now - since >= limit)
    }

    /// Current version of a previously selected train
    ///
    /// A train that vanished from the feed stays selected as last seen.
    #[must_use]
    pub fn refresh_selection(&self, selected: &TrainPosition) -> TrainPosition {
        self.find(&selected.id).cloned().unwrap_or_else(|| selected.clone())
    }
}

/// Fixed-interval poller owning its timer
///
/// Dropping the loop stops it.
pub struct PollingLoop {
    period_ms: u32,
    timer: Option<Interval>,
    sequencer: Rc<RefCell<TickSequencer>>,
}

impl PollingLoop {
    #[must_use]
    pub fn new(period_ms: u32) -> Self {
        Self {
            period_ms,
            timer: None,
            sequencer: Rc::new(RefCell::new(TickSequencer::new())),
        }
    }

    #[must_use]
    pub fn state(&self) -> PollState {
        if self.timer.is_some() {
            PollState::Polling
        } else {
            PollState::Idle
        }
    }

    #[must_use]
    pub fn period_ms(&self) -> u32 {
        self.period_ms
    }

    /// Fire one tick immediately, then one per period until stopped
    ///
    /// Does nothing if already polling.
    pub fn start<P, F>(&mut self, feed: Rc<P>, on_outcome: F)
    where
        P: PositionFeed + 'static,
        F: Fn(TickOutcome) + 'static,
    {
        if self.timer.is_some() {
            return;
        }

        let sequencer = Rc::clone(&self.sequencer);
        let on_outcome = Rc::new(on_outcome);
        let tick = move || {
            let ticket = sequencer.borrow_mut().issue();
            let feed = Rc::clone(&feed);
            let sequencer = Rc::clone(&sequencer);
            let on_outcome = Rc::clone(&on_outcome);

            wasm_bindgen_futures::spawn_local(async move {
                let result = feed.get_positions().await;
                let outcome = sequencer.borrow().resolve(ticket, result);
                (*on_outcome)(outcome);
            });
        };

        tick();
        self.timer = Some(Interval::new(self.period_ms, tick));
    }

    /// Cancel future ticks and invalidate any request still in flight
    pub fn stop(&mut self) {
        // Dropping the interval clears it
        self.timer = None;
        self.sequencer.borrow_mut().cancel();
    }
}

impl Drop for PollingLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn train(id: &str, speed: f64) -> TrainPosition {
        TrainPosition {
            id: id.to_string(),
            speed,
            ..TrainPosition::default()
        }
    }

    fn at(seconds: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_714_550_400 + seconds, 0).expect("timestamp")
    }

    #[test]
    fn test_ticks_are_monotonic() {
        let mut seq = TickSequencer::new();
        assert_eq!(seq.issue(), 1);
        assert_eq!(seq.issue(), 2);
        assert_eq!(seq.latest(), 2);
    }

    #[test]
    fn test_latest_tick_publishes() {
        let mut seq = TickSequencer::new();
        let tick = seq.issue();
        let outcome = seq.resolve(tick, Ok(vec![train("a", 10.0)]));
        assert_eq!(outcome, TickOutcome::Published(vec![train("a", 10.0)]));
    }

    #[test]
    fn test_out_of_order_response_is_discarded() {
        let mut seq = TickSequencer::new();
        let first = seq.issue();
        let second = seq.issue();

        assert!(matches!(seq.resolve(second, Ok(vec![])), TickOutcome::Published(_)));
        assert_eq!(
            seq.resolve(first, Ok(vec![train("stale", 0.0)])),
            TickOutcome::Discarded { tick: 1, latest: 2 }
        );
    }

    #[test]
    fn test_cancel_discards_in_flight() {
        let mut seq = TickSequencer::new();
        let tick = seq.issue();
        seq.cancel();
        assert!(!seq.is_current(tick));
        assert!(matches!(seq.resolve(tick, Ok(vec![])), TickOutcome::Discarded { .. }));

        let restarted = seq.issue();
        assert!(seq.is_current(restarted));
    }

    #[test]
    fn test_failed_tick_keeps_last_known_good() {
        let mut feed = LiveFeed::new();
        let initial = vec![train("a", 80.0), train("b", 0.0)];
        assert!(feed.apply(TickOutcome::Published(initial.clone()), at(0)));

        let changed = feed.apply(
            TickOutcome::Failed(LocationError::Network("HTTP error! status: 503".to_string())),
            at(10),
        );

        assert!(!changed);
        assert_eq!(feed.positions(), initial.as_slice());
        assert_eq!(feed.last_update(), Some(at(0)));
        assert_eq!(feed.consecutive_failures(), 1);
    }

    #[test]
    fn test_discarded_tick_changes_nothing() {
        let mut feed = LiveFeed::new();
        feed.apply(TickOutcome::Published(vec![train("a", 1.0)]), at(0));
        let before = feed.clone();
        assert!(!feed.apply(TickOutcome::Discarded { tick: 1, latest: 3 }, at(10)));
        assert_eq!(feed, before);
    }

    #[test]
    fn test_success_resets_failures() {
        let mut feed = LiveFeed::new();
        feed.apply(TickOutcome::Failed(LocationError::Parse("bad".to_string())), at(0));
        feed.apply(TickOutcome::Failed(LocationError::Parse("bad".to_string())), at(10));
        assert_eq!(feed.consecutive_failures(), 2);
        feed.apply(TickOutcome::Published(vec![]), at(20));
        assert_eq!(feed.consecutive_failures(), 0);
    }

    #[test]
    fn test_staleness_follows_wall_clock() {
        let limit = stale_limit();
        let mut feed = LiveFeed::started_at(at(0));
        assert!(!feed.is_stale(at(10), limit));
        assert!(feed.is_stale(at(30), limit));

        feed.apply(TickOutcome::Published(vec![]), at(40));
        assert!(!feed.is_stale(at(40), limit));

        feed.apply(TickOutcome::Failed(LocationError::Parse("bad".to_string())), at(50));
        assert!(!feed.is_stale(at(60), limit));
        assert!(feed.is_stale(at(70), limit));
    }

    #[test]
    fn test_discarded_ticks_go_stale() {
        let limit = stale_limit();
        let mut feed = LiveFeed::started_at(at(0));
        feed.apply(TickOutcome::Published(vec![train("a", 10.0)]), at(0));

        for (tick, seconds) in (1_u64..=10).zip((10_i64..).step_by(10)) {
            feed.apply(TickOutcome::Discarded { tick, latest: tick + 1 }, at(seconds));
        }

        assert!(feed.is_stale(at(100), limit));
    }

    #[test]
    fn test_unresolved_ticks_go_stale() {
        let mut feed = LiveFeed::started_at(at(0));
        feed.apply(TickOutcome::Published(vec![train("a", 10.0)]), at(5));
        assert!(feed.is_stale(at(35), stale_limit()));
    }

    #[test]
    fn test_feed_without_start_is_never_stale() {
        assert!(!LiveFeed::new().is_stale(at(1_000), stale_limit()));
    }

    #[test]
    fn test_duplicate_ids_keep_last() {
        let mut feed = LiveFeed::new();
        feed.apply(
            TickOutcome::Published(vec![train("a", 10.0), train("b", 0.0), train("a", 40.0)]),
            at(0),
        );

        assert_eq!(feed.positions().len(), 2);
        assert_eq!(feed.positions()[0].id, "a");
        assert_eq!(feed.find("a").map(|t| t.speed), Some(40.0));
    }

    #[test]
    fn test_stale_limit_spans_three_intervals() {
        assert_eq!(stale_limit(), Duration::seconds(30));
    }

    #[test]
    fn test_refresh_selection() {
        let mut feed = LiveFeed::new();
        feed.apply(TickOutcome::Published(vec![train("a", 50.0)]), at(0));

        let refreshed = feed.refresh_selection(&train("a", 10.0));
        assert_eq!(refreshed.speed, 50.0);

        let vanished = feed.refresh_selection(&train("gone", 10.0));
        assert_eq!(vanished, train("gone", 10.0));
    }

    #[test]
    fn test_new_loop_is_idle() {
        let mut poller = PollingLoop::new(10_000);
        assert_eq!(poller.state(), PollState::Idle);
        assert_eq!(poller.period_ms(), 10_000);
        poller.stop();
        assert_eq!(poller.state(), PollState::Idle);
    }
}
