use crate::models::TrainPosition;

pub const TRAIN_ICON_SIZE: [f64; 2] = [24.0, 10.0];
pub const TRAIN_ICON_ANCHOR: [f64; 2] = [12.0, 5.0];
pub const LABEL_ICON_SIZE: [f64; 2] = [40.0, 15.0];
pub const LABEL_ICON_ANCHOR: [f64; 2] = [20.0, -8.0];

/// Fill and border colour for a train marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerColors {
    pub fill: &'static str,
    pub border: &'static str,
}

#[must_use]
pub fn marker_colors(is_moving: bool) -> MarkerColors {
    if is_moving {
        MarkerColors { fill: "#2563eb", border: "#1e40af" }
    } else {
        MarkerColors { fill: "#dc2626", border: "#b91c1c" }
    }
}

/// Inner HTML of the rotated train marker
#[must_use]
pub fn train_icon_html(train: &TrainPosition) -> String {
    let colors = marker_colors(train.is_moving());
    format!(
        "<div class=\"train-marker-body\" style=\"background: {}; border-color: {}; transform: rotate({}deg);\"><div class=\"train-marker-dot\"></div></div>",
        colors.fill,
        colors.border,
        train.normalized_heading()
    )
}

/// Inner HTML of the service label shown under a train
#[must_use]
pub fn label_icon_html(train: &TrainPosition) -> String {
    format!("<div class=\"train-label-body\">{}</div>", escape_html(&train.service))
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
