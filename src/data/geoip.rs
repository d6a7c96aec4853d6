use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::{cli::DEFAULT_GEOIP_URL, domain::weather::Location};

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    city: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

/// One-shot IP geolocation. Every failure reads as "no position available".
#[derive(Debug, Clone)]
pub struct GeoLocator {
    client: Client,
    url: String,
}

impl Default for GeoLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl GeoLocator {
    pub fn new() -> Self {
        Self::with_url(DEFAULT_GEOIP_URL)
    }

    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(5))
                .build()
                .unwrap_or_default(),
            url: url.into(),
        }
    }

    pub async fn locate(&self) -> Option<Location> {
        let response: IpApiResponse = self
            .client
            .get(&self.url)
            .send()
            .await
            .ok()?
            .error_for_status()
            .ok()?
            .json()
            .await
            .ok()?;
        Some(Location {
            name: response.city.filter(|city| !city.is_empty()),
            latitude: response.latitude?,
            longitude: response.longitude?,
        })
    }
}
