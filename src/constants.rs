/// Interval between poll ticks, in milliseconds
pub const POLL_INTERVAL_MS: u32 = 10_000;

/// Number of poll intervals without a successful tick before data is shown as stale
pub const STALE_AFTER_INTERVALS: u32 = 3;

/// Public CORS relay wrapping the upstream response in a `{"contents": ...}` envelope
pub const PUBLIC_RELAY_URL: &str = "https://api.allorigins.win/get";

/// Upstream train location endpoint
pub const UPSTREAM_LOCATIONS_URL: &str = "https://map-api.production.signalbox.io/api/locations";

/// Path served by the bundled relay server
pub const BUNDLED_RELAY_PATH: &str = "/api/locations";

/// `localStorage` flag selecting the bundled relay over the public one
pub const BUNDLED_RELAY_FLAG: &str = "use_bundled_relay";

/// Initial map centre (`[lat, lng]`) and zoom
pub const MAP_CENTER: [f64; 2] = [52.0, -1.0];
pub const MAP_ZOOM: f64 = 6.0;

pub const BASE_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const BASE_TILE_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";
pub const OVERLAY_TILE_ATTRIBUTION: &str =
    "Style: <a href=\"https://creativecommons.org/licenses/by-sa/2.0/\">CC-BY-SA 2.0</a> OpenRailwayMap";

/// Delays above this many minutes are shown as severe
pub const MINOR_DELAY_LIMIT_MINUTES: f64 = 5.0;
