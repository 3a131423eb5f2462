use leptos::{component, view, IntoView};

/// Render a keyboard key as a key cap
#[component]
#[must_use]
fn KeyCap(
    /// The key text to display
    text: &'static str,
) -> impl IntoView {
    view! {
        <span class="key-cap">{text}</span>
    }
}

#[component]
#[must_use]
pub fn ControlsHint() -> impl IntoView {
    view! {
        <div class="controls-info">
            <div class="hint-line">"Pan: drag the map"</div>
            <div class="hint-line">
                "Zoom: "
                <KeyCap text="Scroll" />
                " or "
                <KeyCap text="+" />
                " / "
                <KeyCap text="-" />
            </div>
            <div class="hint-line">
                "Details: click a train, "
                <KeyCap text="Esc" />
                " to close"
            </div>
        </div>
    }
}
