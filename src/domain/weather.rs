use serde::{Deserialize, Serialize};

/// Particle density requested from the constellation theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Density {
    Low,
    Medium,
    Default,
}

/// Theme plus intensity chosen for a weather code or a manual trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeSelection {
    Constellation(Density),
    Rain { heavy: bool },
    Snow,
    Thunderstorm,
}

impl ThemeSelection {
    pub const FALLBACK: Self = Self::Constellation(Density::Default);

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Constellation(Density::Low) => "clear",
            Self::Constellation(Density::Medium) => "cloudy",
            Self::Constellation(Density::Default) => "constellation",
            Self::Rain { heavy: false } => "rain",
            Self::Rain { heavy: true } => "heavy rain",
            Self::Snow => "snow",
            Self::Thunderstorm => "storm",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub name: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn from_coords(lat: f64, lon: f64) -> Self {
        Self {
            name: None,
            latitude: lat,
            longitude: lon,
        }
    }

    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("{:.4}, {:.4}", self.latitude, self.longitude))
    }
}

/// Maps a WMO weather interpretation code to a backdrop theme.
#[must_use]
pub fn classify(code: u8) -> ThemeSelection {
    match code {
        0 => ThemeSelection::Constellation(Density::Low),
        1..=3 => ThemeSelection::Constellation(Density::Medium),
        51..=67 | 80..=82 => ThemeSelection::Rain { heavy: code > 65 },
        71..=77 => ThemeSelection::Snow,
        95..=99 => ThemeSelection::Thunderstorm,
        _ => ThemeSelection::FALLBACK,
    }
}

/// Same as [`classify`] for codes straight off the wire, where anything outside
/// the `u8` range is treated as unknown.
#[must_use]
pub fn classify_raw(code: i64) -> ThemeSelection {
    u8::try_from(code).map_or(ThemeSelection::FALLBACK, classify)
}
