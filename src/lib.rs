#![allow(clippy::implicit_hasher)]
#![allow(unknown_lints)]

pub mod api;
pub mod components;
pub mod constants;
pub mod logging;
pub mod map;
pub mod models;
pub mod polling;
pub mod stats;

pub use components::app::App;
