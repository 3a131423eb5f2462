use leptos::{component, create_memo, view, IntoView, Signal, SignalGet, SignalWith};

use crate::models::TrainPosition;
use crate::stats::TrainStatistics;

#[component]
#[must_use]
pub fn StatisticsPanel(trains: Signal<Vec<TrainPosition>>) -> impl IntoView {
    let stats = create_memo(move |_| trains.with(|t| TrainStatistics::from_positions(t)));

    view! {
        <div class="stats-panel">
            <h3>"Live Statistics"</h3>
            <div class="panel-rows">
                <div class="panel-row">
                    <span class="panel-label">"Total Trains:"</span>
                    <span class="status-blue">{move || stats.get().total}</span>
                </div>
                <div class="panel-row">
                    <span class="panel-label">"Moving:"</span>
                    <span class="status-green">{move || stats.get().moving}</span>
                </div>
                <div class="panel-row">
                    <span class="panel-label">"Stopped:"</span>
                    <span class="status-red">{move || stats.get().stopped}</span>
                </div>
                <div class="panel-row">
                    <span class="panel-label">"Delayed:"</span>
                    <span class="status-orange">{move || stats.get().delayed}</span>
                </div>
                <div class="panel-row">
                    <span class="panel-label">"Avg Speed:"</span>
                    <span class="panel-value">{move || stats.get().average_speed_label()}</span>
                </div>
            </div>
        </div>
    }
}
