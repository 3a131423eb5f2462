use std::fmt;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::constants::{BUNDLED_RELAY_PATH, PUBLIC_RELAY_URL, UPSTREAM_LOCATIONS_URL};
use crate::models::TrainPosition;

/// Failure of a single location fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    /// Transport failure or a non-success HTTP status
    Network(String),
    /// Malformed relay envelope or inner payload
    Parse(String),
}

impl fmt::Display for LocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "Network error: {msg}"),
            Self::Parse(msg) => write!(f, "Parse error: {msg}"),
        }
    }
}

impl std::error::Error for LocationError {}

/// Upstream coordinate pair; either half may be absent or `null`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct GeoPoint {
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}

/// One upstream train location entry
///
/// Every field is optional on the wire; missing values are defaulted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RawRecord {
    /// Minutes behind schedule
    #[serde(default)]
    pub delay: Option<f64>,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    #[serde(default)]
    pub predicted_location: Option<GeoPoint>,
    /// ISO-8601 time the predicted location refers to
    #[serde(default)]
    pub predicted_ts: Option<String>,
    /// Darwin RID of the service
    #[serde(default)]
    pub rid: Option<String>,
    /// Two letter ATOC operator code
    #[serde(default)]
    pub toc_code: Option<String>,
    /// ISO-8601 time the location was observed
    #[serde(default)]
    pub ts: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RelayEnvelope {
    contents: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LocationPayload {
    #[serde(default)]
    train_locations: Vec<RawRecord>,
}

/// Id given to the record at `index` when it carries no usable `rid`
#[must_use]
pub fn fallback_id(index: usize) -> String {
    format!("unidentified-{index}")
}

/// Map an upstream record to a display position
///
/// Total: heading, speed, service and destination are not provided upstream
/// and default to zero/empty. Negative delays (running early) clamp to zero.
/// A record without a `rid` gets an empty id; [`map_records`] replaces it.
#[must_use]
pub fn map_record(raw: &RawRecord) -> TrainPosition {
    let location = raw.location.unwrap_or_default();

    TrainPosition {
        id: raw.rid.clone().unwrap_or_default(),
        lat: location.lat.filter(|v| v.is_finite()).unwrap_or(0.0),
        lng: location.lon.filter(|v| v.is_finite()).unwrap_or(0.0),
        heading: 0.0,
        speed: 0.0,
        service: String::new(),
        operator: raw.toc_code.clone().unwrap_or_default(),
        destination: String::new(),
        delay: raw.delay.filter(|d| d.is_finite()).unwrap_or(0.0).max(0.0),
    }
}

/// Map a whole response, giving every record without a `rid` its own id
#[must_use]
pub fn map_records(records: &[RawRecord]) -> Vec<TrainPosition> {
    records
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            let mut position = map_record(raw);
            if position.id.trim().is_empty() {
                position.id = fallback_id(index);
            }
            position
        })
        .collect()
}

/// Decode a relay response body into raw records
///
/// The relay wraps the upstream body as a JSON string under `contents`,
/// so the payload is decoded twice.
///
/// # Errors
///
/// Returns [`LocationError::Parse`] if either layer is malformed or the relay
/// returned no contents
pub fn parse_envelope(body: &str) -> Result<Vec<RawRecord>, LocationError> {
    let envelope: RelayEnvelope = serde_json::from_str(body)
        .map_err(|e| LocationError::Parse(format!("Invalid relay envelope: {e}")))?;

    let contents = envelope
        .contents
        .ok_or_else(|| LocationError::Parse("Relay returned no contents".to_string()))?;

    let payload: LocationPayload = serde_json::from_str(&contents)
        .map_err(|e| LocationError::Parse(format!("Invalid location payload: {e}")))?;

    Ok(payload.train_locations)
}

/// Where location data is requested from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationSource {
    /// A CORS relay taking the target as its `url` query parameter
    Relayed { relay: String, target: String },
    /// A relay that already knows the target
    Direct { url: String },
}

impl Default for LocationSource {
    fn default() -> Self {
        Self::public_relay()
    }
}

impl LocationSource {
    #[must_use]
    pub fn public_relay() -> Self {
        Self::Relayed {
            relay: PUBLIC_RELAY_URL.to_string(),
            target: UPSTREAM_LOCATIONS_URL.to_string(),
        }
    }

    /// The relay served by the bundled server at `origin`
    #[must_use]
    pub fn bundled_relay(origin: &str) -> Self {
        Self::Direct {
            url: format!("{}{BUNDLED_RELAY_PATH}", origin.trim_end_matches('/')),
        }
    }

    /// # Errors
    ///
    /// Returns [`LocationError::Network`] if the configured URL is invalid
    pub fn request_url(&self) -> Result<Url, LocationError> {
        let result = match self {
            Self::Relayed { relay, target } => Url::parse_with_params(relay, &[("url", target)]),
            Self::Direct { url } => Url::parse(url),
        };
        result.map_err(|e| LocationError::Network(format!("Invalid location URL: {e}")))
    }
}

/// Client for the train location API
#[derive(Debug, Clone, Default)]
pub struct LocationClient {
    http: reqwest::Client,
    source: LocationSource,
}

impl LocationClient {
    #[must_use]
    pub fn new(source: LocationSource) -> Self {
        Self {
            http: reqwest::Client::new(),
            source,
        }
    }

    #[must_use]
    pub fn source(&self) -> &LocationSource {
        &self.source
    }

    /// Fetch the raw upstream records
    ///
    /// Issues exactly one request and never retries.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The HTTP request fails or the status is not a success
    /// - The envelope or the inner payload cannot be decoded
    pub async fn fetch_raw(&self) -> Result<Vec<RawRecord>, LocationError> {
        let url = self.source.request_url()?;

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| LocationError::Network(format!("Request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LocationError::Network(format!("HTTP error! status: {}", status.as_u16())));
        }

        let body = response
            .text()
            .await
            .map_err(|e| LocationError::Network(format!("Failed to read body: {e}")))?;

        parse_envelope(&body)
    }

    /// Fetch and normalize current train positions
    ///
    /// # Errors
    ///
    /// Propagates any [`LocationClient::fetch_raw`] failure
    pub async fn get_positions(&self) -> Result<Vec<TrainPosition>, LocationError> {
        let records = self.fetch_raw().await?;
        Ok(map_records(&records))
    }
}
