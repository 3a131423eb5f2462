pub mod locations;

pub use locations::{LocationClient, LocationError, LocationSource, RawRecord};
