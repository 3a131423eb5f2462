use std::rc::Rc;

use leptos::{
    component, create_effect, create_node_ref, html, on_cleanup, store_value, view, Callable,
    Callback, IntoView, Signal, SignalGet, SignalGetUntracked, SignalWith, SignalWithUntracked,
};

use crate::logging::log;
use crate::map::{LeafletMap, MarkerReconciler, ReconcileSummary};
use crate::models::{RailwayTrack, TileStyle, TrainPosition};

fn report(summary: &ReconcileSummary) {
    for (id, message) in &summary.failures {
        leptos::logging::error!("Failed to place train {id}: {message}");
    }
    log!(
        "Markers: {} created, {} updated, {} removed",
        summary.created,
        summary.updated,
        summary.removed
    );
}

/// Leaflet map showing static tracks and live train markers
#[component]
#[must_use]
pub fn LiveMap(
    trains: Signal<Vec<TrainPosition>>,
    tracks: Vec<RailwayTrack>,
    tile_style: Signal<TileStyle>,
    show_labels: Signal<bool>,
    /// Receives the id of a clicked train
    on_select: Callback<String>,
) -> impl IntoView {
    let container_ref = create_node_ref::<html::Div>();
    let reconciler = store_value(None::<MarkerReconciler<LeafletMap>>);
    let tracks = store_value(tracks);

    // Mount once the container exists
    create_effect(move |_| {
        let Some(container) = container_ref.get() else { return };
        if reconciler.with_value(Option::is_some) {
            return;
        }

        let container_element: &web_sys::HtmlElement = &container;
        let select: Rc<dyn Fn(String)> = Rc::new(move |id| on_select.call(id));

        match LeafletMap::mount(container_element, tile_style.get_untracked(), select) {
            Ok(map) => {
                if let Err(e) = tracks.with_value(|t| map.draw_tracks(t)) {
                    leptos::logging::error!("Failed to draw railway tracks: {:?}", e);
                }
                let mut markers = MarkerReconciler::new(map);
                trains.with_untracked(|current| report(&markers.reconcile(current)));
                reconciler.set_value(Some(markers));
            }
            Err(e) => {
                leptos::logging::error!("Failed to initialize Leaflet map: {:?}", e);
            }
        }
    });

    create_effect(move |_| {
        trains.with(|current| {
            reconciler.update_value(|r| {
                if let Some(markers) = r {
                    report(&markers.reconcile(current));
                }
            });
        });
    });

    create_effect(move |_| {
        let style = tile_style.get();
        reconciler.with_value(|r| {
            if let Some(markers) = r {
                if let Err(e) = markers.surface().set_tile_style(style) {
                    leptos::logging::error!("Failed to switch tile style: {:?}", e);
                }
            }
        });
    });

    on_cleanup(move || {
        reconciler.update_value(|r| {
            if let Some(mut markers) = r.take() {
                markers.clear();
                if let Err(e) = markers.surface().remove() {
                    leptos::logging::error!("Failed to remove map: {:?}", e);
                }
            }
        });
    });

    view! {
        <div
            class="map-container"
            class:hide-train-labels=move || !show_labels.get()
            node_ref=container_ref
        ></div>
    }
}
