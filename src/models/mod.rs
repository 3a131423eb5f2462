mod map_settings;
mod railway_track;
mod train_position;

pub use map_settings::{MapSettings, TileStyle};
pub use railway_track::{RailwayTrack, TrackKind};
pub use train_position::TrainPosition;
