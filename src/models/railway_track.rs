use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Main,
    Branch,
    Siding,
}

impl TrackKind {
    /// Stroke colour used when drawing the track
    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Self::Main => "#4a5568",
            Self::Branch => "#718096",
            Self::Siding => "#a0aec0",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Main => "Main Line",
            Self::Branch => "Branch Line",
            Self::Siding => "Siding",
        }
    }
}

/// A static polyline of railway infrastructure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RailwayTrack {
    pub id: String,
    /// Ordered `[lat, lng]` points
    pub coordinates: Vec<[f64; 2]>,
    pub kind: TrackKind,
}

impl RailwayTrack {
    /// Load the bundled railway network
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled network data cannot be parsed
    pub fn load_network() -> Result<Vec<Self>, String> {
        Self::parse_network(include_str!("../../data/railway_tracks.json"))
    }

    /// Parse a JSON array of tracks
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a track has fewer than two points
    pub fn parse_network(json: &str) -> Result<Vec<Self>, String> {
        let tracks: Vec<Self> = serde_json::from_str(json)
            .map_err(|e| format!("Failed to parse railway network: {e}"))?;

        if let Some(track) = tracks.iter().find(|t| t.coordinates.len() < 2) {
            return Err(format!("Track {} has fewer than two points", track.id));
        }

        Ok(tracks)
    }
}
