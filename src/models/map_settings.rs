use serde::{Deserialize, Serialize};

const MAP_SETTINGS_KEY: &str = "rail_live_map.settings";

/// `OpenRailwayMap` overlay rendering style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TileStyle {
    #[default]
    Standard,
    Signals,
    MaxSpeed,
    Electrification,
}

impl TileStyle {
    pub const ALL: [Self; 4] = [Self::Standard, Self::Signals, Self::MaxSpeed, Self::Electrification];

    /// Style key as used in the overlay tile URL
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Signals => "signals",
            Self::MaxSpeed => "maxspeed",
            Self::Electrification => "electrification",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Standard => "Infrastructure",
            Self::Signals => "Signalling",
            Self::MaxSpeed => "Max Speed",
            Self::Electrification => "Electrification",
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|style| style.key() == key)
    }

    /// Leaflet URL template for the railway overlay in this style
    #[must_use]
    pub fn overlay_url(self) -> String {
        format!("https://{{s}}.tiles.openrailwaymap.org/{}/{{z}}/{{x}}/{{y}}.png", self.key())
    }
}

/// Map display preferences persisted in `localStorage`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapSettings {
    #[serde(default)]
    pub tile_style: TileStyle,
    #[serde(default = "default_show_labels")]
    pub show_labels: bool,
}

fn default_show_labels() -> bool {
    true
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            tile_style: TileStyle::default(),
            show_labels: default_show_labels(),
        }
    }
}

impl MapSettings {
    /// Parse stored settings, falling back to defaults when absent or corrupt
    #[must_use]
    pub fn from_json(json: Option<&str>) -> Self {
        json.and_then(|s| serde_json::from_str(s).ok()).unwrap_or_default()
    }

    /// Load settings from `localStorage`
    #[must_use]
    pub fn load() -> Self {
        let stored = web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .and_then(|storage| storage.get_item(MAP_SETTINGS_KEY).ok().flatten());

        Self::from_json(stored.as_deref())
    }

    /// Save settings to `localStorage`
    ///
    /// # Errors
    ///
    /// Returns an error if storage is unavailable or the write is rejected
    pub fn save(&self) -> Result<(), String> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or("localStorage not available")?;

        let json_str = serde_json::to_string(self)
            .map_err(|e| format!("Failed to serialize settings: {e}"))?;

        storage
            .set_item(MAP_SETTINGS_KEY, &json_str)
            .map_err(|e| format!("Failed to save settings: {e:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_keys() {
        let keys: Vec<_> = TileStyle::ALL.iter().map(|s| s.key()).collect();
        assert_eq!(keys, vec!["standard", "signals", "maxspeed", "electrification"]);
    }

    #[test]
    fn test_from_key() {
        assert_eq!(TileStyle::from_key("maxspeed"), Some(TileStyle::MaxSpeed));
        assert_eq!(TileStyle::from_key("gauge"), None);
    }

    #[test]
    fn test_overlay_url_swaps_only_style() {
        assert_eq!(
            TileStyle::Signals.overlay_url(),
            "https://{s}.tiles.openrailwaymap.org/signals/{z}/{x}/{y}.png"
        );
        assert_eq!(
            TileStyle::Electrification.overlay_url(),
            "https://{s}.tiles.openrailwaymap.org/electrification/{z}/{x}/{y}.png"
        );
    }

    #[test]
    fn test_settings_defaults_when_absent() {
        assert_eq!(MapSettings::from_json(None), MapSettings::default());
        assert!(MapSettings::default().show_labels);
        assert_eq!(MapSettings::default().tile_style, TileStyle::Standard);
    }

    #[test]
    fn test_settings_defaults_when_corrupt() {
        assert_eq!(MapSettings::from_json(Some("{{{")), MapSettings::default());
    }

    #[test]
    fn test_settings_roundtrip_with_missing_field() {
        let settings = MapSettings::from_json(Some(r#"{"tile_style": "maxspeed"}"#));
        assert_eq!(settings.tile_style, TileStyle::MaxSpeed);
        assert!(settings.show_labels);
    }
}
