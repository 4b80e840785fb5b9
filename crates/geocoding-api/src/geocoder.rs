//! Forward and reverse geocoding over the Maps and Nominatim clients

use maps_scraper::{format_degrees, place_url, Coordinate, MapsClient, SearchOutcome};
use nominatim_client::NominatimClient;
use tracing::{debug, warn};

/// Address text resolved for a coordinate pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReverseGeocoded {
    pub address: String,
    pub formatted_address: String,
    pub google_maps_url: String,
}

impl ReverseGeocoded {
    /// Last-resort result when no upstream produced an address
    pub fn placeholder(latitude: f64, longitude: f64) -> Self {
        let pair = format!("{}, {}", format_degrees(latitude), format_degrees(longitude));
        Self {
            formatted_address: format!("Location at {}", pair),
            address: pair,
            google_maps_url: place_url(latitude, longitude),
        }
    }
}

pub struct Geocoder {
    maps: MapsClient,
    nominatim: NominatimClient,
}

impl Geocoder {
    pub fn new(maps: MapsClient, nominatim: NominatimClient) -> Self {
        Self { maps, nominatim }
    }

    /// Address text to coordinates via a Maps search
    pub async fn geocode(&self, address: &str) -> SearchOutcome {
        self.maps.search(address).await
    }

    /// Coordinates to address text. Always produces a result.
    ///
    /// Tries Nominatim, then the Maps place-page redirect, then falls back
    /// to a placeholder built from the coordinates themselves.
    pub async fn reverse_geocode(&self, latitude: f64, longitude: f64) -> ReverseGeocoded {
        if let Some(result) = self.from_nominatim(latitude, longitude).await {
            return result;
        }
        if let Some(result) = self.from_place_page(latitude, longitude).await {
            return result;
        }
        debug!(lat = latitude, lon = longitude, "Using placeholder address");
        ReverseGeocoded::placeholder(latitude, longitude)
    }

    async fn from_nominatim(&self, latitude: f64, longitude: f64) -> Option<ReverseGeocoded> {
        match self.nominatim.reverse_geocode(latitude, longitude).await {
            Ok(Some(lookup)) => Some(ReverseGeocoded {
                formatted_address: lookup.formatted_address(),
                address: lookup.display_name,
                google_maps_url: place_url(latitude, longitude),
            }),
            Ok(None) => None,
            Err(e) => {
                warn!(lat = latitude, lon = longitude, error = %e, "Nominatim lookup failed");
                None
            }
        }
    }

    async fn from_place_page(&self, latitude: f64, longitude: f64) -> Option<ReverseGeocoded> {
        let coordinate = Coordinate::new(latitude, longitude)?;
        match self.maps.place_name(coordinate).await {
            Ok(place) => Some(ReverseGeocoded {
                address: place.name.clone(),
                formatted_address: place.name,
                google_maps_url: place.url,
            }),
            Err(e) => {
                warn!(lat = latitude, lon = longitude, error = %e, "Place page lookup failed");
                None
            }
        }
    }
}
