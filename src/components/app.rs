use std::rc::Rc;

use chrono::Utc;
use gloo_timers::callback::Interval;
use leptos::{
    component, create_memo, create_rw_signal, ev, on_cleanup, store_value, view, window, Callback,
    IntoView, RwSignal, Signal, SignalGet, SignalSet, SignalUpdate, SignalUpdateUntracked,
    SignalWith, SignalWithUntracked,
};
use leptos_meta::{provide_meta_context, Title};
use leptos_use::use_event_listener;

use crate::api::{LocationClient, LocationSource};
use crate::components::controls_hint::ControlsHint;
use crate::components::legend::Legend;
use crate::components::live_map::LiveMap;
use crate::components::statistics_panel::StatisticsPanel;
use crate::components::style_selector::StyleSelector;
use crate::components::train_info_panel::TrainInfoPanel;
use crate::constants::{BUNDLED_RELAY_FLAG, POLL_INTERVAL_MS};
use crate::logging::log;
use crate::models::{MapSettings, RailwayTrack, TrainPosition};
use crate::polling::{stale_limit, LiveFeed, PollingLoop, TickOutcome};

/// Public relay unless the bundled relay flag is set in `localStorage`
fn location_source() -> LocationSource {
    let window = web_sys::window();
    let use_bundled = window
        .as_ref()
        .and_then(|w| w.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item(BUNDLED_RELAY_FLAG).ok().flatten())
        .is_some();
    let origin = window.and_then(|w| w.location().origin().ok());

    match origin {
        Some(origin) if use_bundled => LocationSource::bundled_relay(&origin),
        _ => LocationSource::public_relay(),
    }
}

fn handle_outcome(
    feed: RwSignal<LiveFeed>,
    selected: RwSignal<Option<TrainPosition>>,
    outcome: TickOutcome,
) {
    let now = Utc::now();
    match outcome {
        TickOutcome::Discarded { tick, latest } => {
            log!("Discarding response of tick {} (latest is {})", tick, latest);
        }
        TickOutcome::Failed(e) => {
            leptos::logging::error!("Error fetching locations: {e}");
            // Positions unchanged; bookkeeping only
            let _ = feed.try_update_untracked(|f| f.apply(TickOutcome::Failed(e), now));
        }
        TickOutcome::Published(positions) => {
            log!("Received {} train positions", positions.len());
            let _ = feed.try_update(|f| f.apply(TickOutcome::Published(positions), now));
            selected.update(|current| {
                if let Some(train) = current.as_mut() {
                    *train = feed.with_untracked(|f| f.refresh_selection(train));
                }
            });
        }
    }
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let feed = create_rw_signal(LiveFeed::started_at(Utc::now()));
    let selected = create_rw_signal(None::<TrainPosition>);
    let settings = create_rw_signal(MapSettings::load());
    let tracks = RailwayTrack::load_network().unwrap_or_else(|e| {
        leptos::logging::error!("{e}");
        Vec::new()
    });

    let trains: Signal<Vec<TrainPosition>> =
        create_memo(move |_| feed.with(|f| f.positions().to_vec())).into();
    let last_update = Signal::derive(move || feed.with(LiveFeed::last_update));

    // Wall clock for staleness
    let clock = create_rw_signal(Utc::now());
    let clock_timer = store_value(Some(Interval::new(POLL_INTERVAL_MS, move || {
        clock.set(Utc::now());
    })));
    on_cleanup(move || clock_timer.set_value(None));
    let stale = Signal::derive(move || {
        let now = clock.get();
        feed.with(|f| f.is_stale(now, stale_limit()))
    });
    let tile_style = Signal::derive(move || settings.with(|s| s.tile_style));
    let show_labels = Signal::derive(move || settings.with(|s| s.show_labels));

    let poller = store_value(PollingLoop::new(POLL_INTERVAL_MS));
    let client = Rc::new(LocationClient::new(location_source()));
    poller.update_value(|p| {
        p.start(client, move |outcome| handle_outcome(feed, selected, outcome));
    });
    on_cleanup(move || poller.update_value(PollingLoop::stop));

    let _ = use_event_listener(window(), ev::keydown, move |event| {
        if event.key() == "Escape" {
            selected.set(None);
        }
    });

    let on_select = Callback::new(move |id: String| {
        selected.set(feed.with_untracked(|f| f.find(&id).cloned()));
    });
    let on_close = Callback::new(move |()| selected.set(None));

    view! {
        <Title text="Live Train Map"/>

        <div class="app">
            <LiveMap
                trains=trains
                tracks=tracks
                tile_style=tile_style
                show_labels=show_labels
                on_select=on_select
            />
            <StatisticsPanel trains=trains />
            <TrainInfoPanel selected=selected.into() on_close=on_close />
            <Legend last_update=last_update stale=stale />
            <StyleSelector settings=settings />
            <ControlsHint />
        </div>
    }
}
