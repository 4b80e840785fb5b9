//! Google Maps scraping helpers
//!
//! Pulls coordinates out of the URLs and HTML the Maps web UI returns for
//! a search, and resolves place names for a coordinate pair by following
//! the `/maps/place/<lat>,<lng>` redirect.

mod client;
mod error;
mod extract;
mod types;

pub use client::{place_url, MapsClient, BROWSER_USER_AGENT, PUBLIC_BASE_URL};
pub use error::{MapsError, Result};
pub use extract::{extract_coordinates, extract_from_html, extract_from_url};
pub use types::{format_degrees, Coordinate, PlaceMatch, SearchOutcome};
