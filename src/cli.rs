#![allow(clippy::missing_errors_doc)]

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::{
    domain::weather::{Density, Location, ThemeSelection},
    scene::{
        DeviceClass,
        snow::{QualityMode, SnowOverrides},
    },
};

pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
pub const DEFAULT_GEOIP_URL: &str = "https://ipapi.co/json/";

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThemeArg {
    Auto,
    Clear,
    Cloudy,
    Rain,
    HeavyRain,
    Snow,
    Storm,
}

impl ThemeArg {
    /// The fixed selection for a manual theme, `None` for weather-driven.
    #[must_use]
    pub fn selection(self) -> Option<ThemeSelection> {
        match self {
            Self::Auto => None,
            Self::Clear => Some(ThemeSelection::Constellation(Density::Low)),
            Self::Cloudy => Some(ThemeSelection::Constellation(Density::Medium)),
            Self::Rain => Some(ThemeSelection::Rain { heavy: false }),
            Self::HeavyRain => Some(ThemeSelection::Rain { heavy: true }),
            Self::Snow => Some(ThemeSelection::Snow),
            Self::Storm => Some(ThemeSelection::Thunderstorm),
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum DeviceArg {
    #[default]
    Auto,
    Desktop,
    Constrained,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum QualityArg {
    Full,
    Adaptive,
}

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Parser, Clone)]
#[command(
    name = "weather-backdrop",
    version,
    about = "Weather-driven animated terminal backdrop"
)]
pub struct Cli {
    /// Theme override (auto follows the current weather)
    #[arg(long, value_enum, default_value_t = ThemeArg::Auto)]
    pub theme: ThemeArg,

    /// Target FPS (15..60)
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u8).range(15..=60))]
    pub fps: u8,

    /// Direct latitude (requires --lon)
    #[arg(long, allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Direct longitude (requires --lat)
    #[arg(long, allow_hyphen_values = true)]
    pub lon: Option<f64>,

    /// Forecast endpoint
    #[arg(long, default_value = DEFAULT_FORECAST_URL)]
    pub forecast_url: String,

    /// IP geolocation endpoint
    #[arg(long, default_value = DEFAULT_GEOIP_URL)]
    pub geoip_url: String,

    /// Device class used for entity counts and snowman limits
    #[arg(long, value_enum, default_value_t = DeviceArg::Auto)]
    pub device: DeviceArg,

    /// Snowman count that summons the monster
    #[arg(long)]
    pub monster_threshold: Option<usize>,

    /// Maximum live snowmen
    #[arg(long)]
    pub max_snowmen: Option<usize>,

    /// Snowmen placed when the snow theme starts
    #[arg(long)]
    pub initial_snowmen: Option<usize>,

    /// Snowman physics quality under load
    #[arg(long, value_enum)]
    pub quality: Option<QualityArg>,

    /// Ring the terminal bell when the monster appears
    #[arg(long)]
    pub bell: bool,

    /// Seed for deterministic animation
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write diagnostics to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Do not read or write the first-run state file
    #[arg(long)]
    pub no_state: bool,
}

impl Cli {
    pub fn validate(&self) -> anyhow::Result<()> {
        match (self.lat, self.lon) {
            (Some(_), None) | (None, Some(_)) => {
                anyhow::bail!("--lat and --lon must be provided together")
            }
            _ => {}
        }
        if let (Some(threshold), Some(cap)) = (self.monster_threshold, self.max_snowmen)
            && threshold > cap
        {
            anyhow::bail!("--monster-threshold ({threshold}) cannot exceed --max-snowmen ({cap})");
        }
        if self.monster_threshold == Some(0) || self.max_snowmen == Some(0) {
            anyhow::bail!("snowman limits must be at least 1");
        }
        Ok(())
    }

    #[must_use]
    pub fn device_class(&self) -> Option<DeviceClass> {
        match self.device {
            DeviceArg::Auto => None,
            DeviceArg::Desktop => Some(DeviceClass::Desktop),
            DeviceArg::Constrained => Some(DeviceClass::Constrained),
        }
    }

    #[must_use]
    pub fn snow_overrides(&self) -> SnowOverrides {
        SnowOverrides {
            max_snowmen: self.max_snowmen,
            monster_threshold: self.monster_threshold,
            initial_snowmen: self.initial_snowmen,
            quality: self.quality.map(|quality| match quality {
                QualityArg::Full => QualityMode::Full,
                QualityArg::Adaptive => QualityMode::Adaptive,
            }),
        }
    }

    #[must_use]
    pub fn fixed_location(&self) -> Option<Location> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(Location::from_coords(lat, lon)),
            _ => None,
        }
    }
}
