pub mod leaflet;
pub mod marker_style;
pub mod reconciler;

pub use leaflet::{LeafletLayer, LeafletMap};
pub use reconciler::{plan_changes, MarkerChange, MarkerReconciler, MarkerSurface, ReconcileSummary};
