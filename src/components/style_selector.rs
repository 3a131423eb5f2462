use leptos::{
    component, event_target_checked, event_target_value, view, CollectView, IntoView, RwSignal,
    SignalUpdate, SignalWith, SignalWithUntracked,
};

use crate::models::{MapSettings, TileStyle};

fn update_settings(settings: RwSignal<MapSettings>, f: impl FnOnce(&mut MapSettings)) {
    settings.update(f);
    if let Err(e) = settings.with_untracked(MapSettings::save) {
        leptos::logging::error!("{e}");
    }
}

/// Overlay style picker and label toggle
#[component]
#[must_use]
pub fn StyleSelector(settings: RwSignal<MapSettings>) -> impl IntoView {
    let on_style_change = move |event: web_sys::Event| {
        if let Some(style) = TileStyle::from_key(&event_target_value(&event)) {
            update_settings(settings, |s| s.tile_style = style);
        }
    };

    let on_labels_change = move |event: web_sys::Event| {
        let show = event_target_checked(&event);
        update_settings(settings, |s| s.show_labels = show);
    };

    view! {
        <div class="style-selector">
            <label for="tile-style">"Railway overlay"</label>
            <select id="tile-style" on:change=on_style_change>
                {TileStyle::ALL
                    .into_iter()
                    .map(|style| view! {
                        <option
                            value=style.key()
                            selected=move || settings.with(|s| s.tile_style == style)
                        >
                            {style.label()}
                        </option>
                    })
                    .collect_view()}
            </select>
            <label class="label-toggle">
                <input
                    type="checkbox"
                    prop:checked=move || settings.with(|s| s.show_labels)
                    on:change=on_labels_change
                />
                "Service labels"
            </label>
        </div>
    }
}
