//! Request and response bodies for the HTTP surface

use serde::{Deserialize, Serialize};

/// `?address=` or `{"address": ...}`
#[derive(Debug, Deserialize)]
pub struct AddressRequest {
    pub address: String,
}

/// `?lat=&long=` or `{"lat": ..., "long": ...}`
#[derive(Debug, Deserialize)]
pub struct CoordinateRequest {
    pub lat: f64,
    pub long: f64,
}

#[derive(Debug, Serialize)]
pub struct CoordinateResponse {
    pub address: String,
    pub lat: f64,
    pub long: f64,
    pub coordinates: String,
    pub google_maps_url: String,
}

#[derive(Debug, Serialize)]
pub struct AddressResponse {
    pub lat: f64,
    pub long: f64,
    pub address: String,
    pub formatted_address: String,
    pub google_maps_url: String,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_request_deserialization() {
        let req: CoordinateRequest =
            serde_json::from_str(r#"{"lat": 28.4391604, "long": 77.0388113}"#).unwrap();
        assert_eq!(req.lat, 28.4391604);
        assert_eq!(req.long, 77.0388113);
    }

    #[test]
    fn test_coordinate_response_serialization() {
        let response = CoordinateResponse {
            address: "Medanta Hospital Gurgaon".to_string(),
            lat: 28.4391604,
            long: 77.0388113,
            coordinates: "28.4391604, 77.0388113".to_string(),
            google_maps_url: "https://www.google.com/maps/search/Medanta".to_string(),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["long"], 77.0388113);
        assert_eq!(json["coordinates"], "28.4391604, 77.0388113");
    }
}
