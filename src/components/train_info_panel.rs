use leptos::{component, view, Callable, Callback, IntoView, Signal, SignalGet};

use crate::models::TrainPosition;
use crate::stats::{delay_label, movement_label, DelayStatus};

/// Details of the selected train; renders nothing without a selection
#[component]
#[must_use]
pub fn TrainInfoPanel(
    selected: Signal<Option<TrainPosition>>,
    on_close: Callback<()>,
) -> impl IntoView {
    view! {
        {move || selected.get().map(|train| {
            let delay_class = DelayStatus::from_delay(train.delay).css_class();
            let status_class = if train.is_moving() { "status-green" } else { "status-red" };

            view! {
                <div class="train-info-panel">
                    <div class="panel-header">
                        <h3>{format!("{} - {}", train.service, train.operator)}</h3>
                        <button class="close-button" title="Close" on:click=move |_| on_close.call(())>"×"</button>
                    </div>
                    <div class="panel-rows">
                        <div class="panel-row">
                            <span class="panel-label">"Destination:"</span>
                            <span class="panel-value">{train.destination.clone()}</span>
                        </div>
                        <div class="panel-row">
                            <span class="panel-label">"Speed:"</span>
                            <span class="panel-value">{format!("{} mph", train.speed.round())}</span>
                        </div>
                        <div class="panel-row">
                            <span class="panel-label">"Delay:"</span>
                            <span class=delay_class>{delay_label(train.delay)}</span>
                        </div>
                        <div class="panel-row">
                            <span class="panel-label">"Status:"</span>
                            <span class=status_class>{movement_label(&train)}</span>
                        </div>
                        <div class="panel-row">
                            <span class="panel-label">"Heading:"</span>
                            <span class="panel-value">{format!("{}°", train.heading.round())}</span>
                        </div>
                    </div>
                </div>
            }
        })}
    }
}
