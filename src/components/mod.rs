#![allow(clippy::needless_pass_by_value)]

pub mod app;
pub mod controls_hint;
pub mod legend;
pub mod live_map;
pub mod statistics_panel;
pub mod style_selector;
pub mod train_info_panel;
