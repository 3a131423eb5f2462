#![cfg(target_arch = "wasm32")]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use rail_live_map::api::LocationError;
use rail_live_map::models::{MapSettings, TileStyle, TrainPosition};
use rail_live_map::polling::{PollState, PollingLoop, PositionFeed, TickOutcome};
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};

wasm_bindgen_test_configure!(run_in_browser);

struct FixedFeed(Vec<TrainPosition>);

impl PositionFeed for FixedFeed {
    async fn get_positions(&self) -> Result<Vec<TrainPosition>, LocationError> {
        Ok(self.0.clone())
    }
}

fn fixed_feed() -> Rc<FixedFeed> {
    Rc::new(FixedFeed(vec![TrainPosition {
        id: "202405017654321".to_string(),
        operator: "GW".to_string(),
        ..TrainPosition::default()
    }]))
}

/// Fails its first request, then succeeds
struct RecoveringFeed {
    calls: Cell<u32>,
}

impl PositionFeed for RecoveringFeed {
    async fn get_positions(&self) -> Result<Vec<TrainPosition>, LocationError> {
        let call = self.calls.get() + 1;
        self.calls.set(call);
        if call == 1 {
            Err(LocationError::Network("HTTP error! status: 503".to_string()))
        } else {
            Ok(vec![TrainPosition::default()])
        }
    }
}

#[wasm_bindgen_test]
fn test_settings_persist_in_local_storage() {
    let settings = MapSettings {
        tile_style: TileStyle::Electrification,
        show_labels: false,
    };
    settings.save().expect("save settings");

    assert_eq!(MapSettings::load(), settings);
}

#[wasm_bindgen_test]
async fn test_start_fires_immediate_tick() {
    let outcomes = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&outcomes);

    let mut poller = PollingLoop::new(10_000);
    poller.start(fixed_feed(), move |outcome| sink.borrow_mut().push(outcome));
    assert_eq!(poller.state(), PollState::Polling);

    TimeoutFuture::new(50).await;

    let seen = outcomes.borrow();
    assert_eq!(seen.len(), 1);
    assert!(matches!(&seen[0], TickOutcome::Published(p) if p.len() == 1));
    drop(seen);

    poller.stop();
    assert_eq!(poller.state(), PollState::Idle);
}

#[wasm_bindgen_test]
async fn test_stop_discards_in_flight_response() {
    let outcomes = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&outcomes);

    let mut poller = PollingLoop::new(10_000);
    poller.start(fixed_feed(), move |outcome| sink.borrow_mut().push(outcome));
    poller.stop();

    TimeoutFuture::new(50).await;

    let seen = outcomes.borrow();
    assert_eq!(seen.len(), 1);
    assert!(matches!(seen[0], TickOutcome::Discarded { tick: 1, latest: 1 }));
}

#[wasm_bindgen_test]
async fn test_failed_tick_keeps_polling() {
    let outcomes = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&outcomes);
    let feed = Rc::new(RecoveringFeed { calls: Cell::new(0) });

    let mut poller = PollingLoop::new(20);
    poller.start(Rc::clone(&feed), move |outcome| sink.borrow_mut().push(outcome));

    TimeoutFuture::new(200).await;
    poller.stop();
    assert_eq!(poller.state(), PollState::Idle);

    let seen = outcomes.borrow();
    assert!(matches!(seen.first(), Some(TickOutcome::Failed(LocationError::Network(_)))));
    assert!(seen.iter().skip(1).any(|o| matches!(o, TickOutcome::Published(p) if p.len() == 1)));
    assert!(feed.calls.get() >= 2);
}
