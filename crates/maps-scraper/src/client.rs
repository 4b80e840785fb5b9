use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use reqwest::Client;
use tracing::{debug, warn};

use crate::error::{MapsError, Result};
use crate::extract::extract_coordinates;
use crate::types::{format_degrees, Coordinate, PlaceMatch, SearchOutcome};

/// Public Maps origin, used for links handed back to callers
pub const PUBLIC_BASE_URL: &str = "https://www.google.com";

/// Desktop Chrome UA; the Maps UI serves a stripped page to unknown agents
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const DEFAULT_TIMEOUT_SECS: u64 = 10;

static PLACE_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/place/([^/@]+)/@").unwrap());

/// Shareable place link for a coordinate pair
pub fn place_url(latitude: f64, longitude: f64) -> String {
    format!(
        "{}/maps/place/{},{}",
        PUBLIC_BASE_URL,
        format_degrees(latitude),
        format_degrees(longitude)
    )
}

/// HTTP client for the Maps web UI
#[derive(Debug, Clone)]
pub struct MapsClient {
    client: Client,
    base_url: String,
}

impl MapsClient {
    /// Create a client against the public Maps origin with a 10s timeout
    pub fn new() -> Result<Self> {
        Self::with_base_url(PUBLIC_BASE_URL, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a client against a custom origin
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(BROWSER_USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Forward geocode free text by running a Maps search.
    ///
    /// Never fails: transport errors come back as `NotFound` with the error
    /// text in `details`.
    pub async fn search(&self, address: &str) -> SearchOutcome {
        match self.fetch_search(address).await {
            Ok((url, body)) => match extract_coordinates(&url, Some(&body)) {
                Some(coordinate) => SearchOutcome::Found { coordinate, url },
                None => {
                    debug!(address, url = %url, "No coordinates in search result");
                    SearchOutcome::NotFound { details: url }
                }
            },
            Err(e) => {
                warn!(address, error = %e, "Maps search request failed");
                SearchOutcome::NotFound {
                    details: e.to_string(),
                }
            }
        }
    }

    /// Resolve a place name by following the place-page redirect
    pub async fn place_name(&self, coordinate: Coordinate) -> Result<PlaceMatch> {
        let url = format!(
            "{}/maps/place/{},{}",
            self.base_url,
            format_degrees(coordinate.latitude),
            format_degrees(coordinate.longitude)
        );
        debug!(url = %url, "Fetching place page");

        let response = self.client.get(&url).send().await?;
        let resolved = response.url().to_string();

        match parse_place_name(&resolved) {
            Some(name) => Ok(PlaceMatch {
                name,
                url: resolved,
            }),
            None => Err(MapsError::NoPlaceName(resolved)),
        }
    }

    /// Returns the final URL after redirects and the response body
    async fn fetch_search(&self, address: &str) -> Result<(String, String)> {
        let url = format!(
            "{}/maps/search/{}",
            self.base_url,
            urlencoding::encode(address)
        );
        debug!(url = %url, "Searching Maps");

        let response = self.client.get(&url).send().await?;
        let resolved = response.url().to_string();
        let body = response.text().await?;

        Ok((resolved, body))
    }
}

/// Pull the `<name>` out of `/place/<name>/@...`, decoding `+` and `%XX`
fn parse_place_name(url: &str) -> Option<String> {
    let caps = PLACE_NAME_RE.captures(url)?;
    let spaced = caps[1].replace('+', " ");
    let decoded = urlencoding::decode_binary(spaced.as_bytes());
    Some(String::from_utf8_lossy(&decoded).into_owned())
}
