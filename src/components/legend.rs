use std::fmt::Display;

use chrono::{DateTime, Local, TimeZone, Utc};
use leptos::{component, view, IntoView, Signal, SignalGet};

use crate::models::TrackKind;

/// Clock time of the last successful update
#[must_use]
pub fn format_last_update<Tz>(at: Option<DateTime<Tz>>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    at.map_or_else(
        || "waiting for data".to_string(),
        |t| t.format("%H:%M:%S").to_string(),
    )
}

#[component]
#[must_use]
pub fn Legend(
    last_update: Signal<Option<DateTime<Utc>>>,
    /// Whether no update has landed for several poll intervals
    stale: Signal<bool>,
) -> impl IntoView {
    view! {
        <div class="legend-panel">
            <h4>"Legend"</h4>
            <div class="legend-items">
                <div class="legend-item">
                    <div class="train-legend-box train-legend-moving"></div>
                    <span>"Moving Train"</span>
                </div>
                <div class="legend-item">
                    <div class="train-legend-box train-legend-stopped"></div>
                    <span>"Stopped Train"</span>
                </div>
                <div class="legend-item">
                    <div class="track-legend-line" style=format!("background: {};", TrackKind::Main.color())></div>
                    <span>{TrackKind::Main.label()}</span>
                </div>
                <div class="legend-item">
                    <div class="track-legend-line" style=format!("background: {};", TrackKind::Branch.color())></div>
                    <span>{TrackKind::Branch.label()}</span>
                </div>
            </div>
            <div class="legend-footer" class:legend-stale=move || stale.get()>
                "Last update: "
                {move || format_last_update(last_update.get().map(|t| t.with_timezone(&Local)))}
                {move || stale.get().then_some(" (stale)")}
            </div>
        </div>
    }
}
