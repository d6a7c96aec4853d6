use crate::domain::weather::{Location, ThemeSelection, classify_raw};

use super::{forecast::ForecastClient, geoip::GeoLocator};

/// Outcome of one weather lookup. A failed lookup still carries a selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub selection: ThemeSelection,
    pub code: Option<i64>,
    pub location: Option<Location>,
}

impl Resolution {
    pub fn fallback(location: Option<Location>) -> Self {
        Self {
            selection: ThemeSelection::FALLBACK,
            code: None,
            location,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.code.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct WeatherResolver {
    geo: GeoLocator,
    forecast: ForecastClient,
    fixed: Option<Location>,
}

impl WeatherResolver {
    pub fn new(geo: GeoLocator, forecast: ForecastClient, fixed: Option<Location>) -> Self {
        Self {
            geo,
            forecast,
            fixed,
        }
    }

    /// Locates the viewer and classifies the current weather there, falling
    /// back to the default constellation on any failure.
    pub async fn resolve(&self) -> Resolution {
        let location = match &self.fixed {
            Some(location) => location.clone(),
            None => match self.geo.locate().await {
                Some(location) => location,
                None => {
                    log::warn!("geolocation unavailable, using fallback theme");
                    return Resolution::fallback(None);
                }
            },
        };

        match self.forecast.current_code(&location).await {
            Ok(code) => {
                let selection = classify_raw(code);
                log::info!(
                    "weather code {code} at {} -> {}",
                    location.display_name(),
                    selection.label()
                );
                Resolution {
                    selection,
                    code: Some(code),
                    location: Some(location),
                }
            }
            Err(err) => {
                log::warn!("weather lookup failed, using fallback theme: {err:#}");
                Resolution::fallback(Some(location))
            }
        }
    }
}
