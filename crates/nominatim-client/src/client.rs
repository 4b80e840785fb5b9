use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{NominatimError, Result};
use crate::types::{NominatimResponse, ReverseLookup};

const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";
const DEFAULT_USER_AGENT: &str = "GeocodingAPI/1.0";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Nominatim reverse geocoding client
#[derive(Debug, Clone)]
pub struct NominatimClient {
    client: reqwest::Client,
    base_url: String,
}

impl NominatimClient {
    /// Create a new client with default settings
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a new client with a custom Nominatim URL
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        Self::with_options(
            base_url,
            DEFAULT_USER_AGENT,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }

    /// Create a new client with a custom Nominatim URL, user agent and timeout
    pub fn with_options(base_url: &str, user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Reverse geocode coordinates.
    ///
    /// `Ok(None)` means Nominatim answered but had nothing to say (an
    /// `error` payload or no `display_name`).
    pub async fn reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<ReverseLookup>> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(NominatimError::InvalidCoordinates(latitude, longitude));
        }

        let url = format!(
            "{}/reverse?lat={}&lon={}&format=json&addressdetails=1",
            self.base_url, latitude, longitude
        );

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NominatimError::ApiError(format!(
                "Nominatim returned status {}",
                response.status()
            )));
        }

        let data: NominatimResponse = response.json().await?;

        if let Some(ref err) = data.error {
            warn!(lat = latitude, lon = longitude, error = %err, "Nominatim returned error");
            return Ok(None);
        }

        let Some(display_name) = data.display_name else {
            debug!(lat = latitude, lon = longitude, "Nominatim response without display_name");
            return Ok(None);
        };

        debug!(
            lat = latitude,
            lon = longitude,
            country = data.address.country.as_deref().unwrap_or("unknown"),
            "Geocoded coordinates"
        );

        Ok(Some(ReverseLookup {
            display_name,
            address: data.address,
        }))
    }
}
