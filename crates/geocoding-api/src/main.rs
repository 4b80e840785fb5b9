//! Geocoding API - forward and reverse geocoding over HTTP
//!
//! Forward lookups scrape Google Maps search results; reverse lookups go to
//! Nominatim with a Maps place-page fallback. CSV and Excel uploads are
//! geocoded row by row and returned as CSV.

mod batch;
mod config;
mod error;
mod geocoder;
mod scratch;
mod server;
mod table;
mod types;

use crate::config::Config;
use crate::error::Result;
use crate::geocoder::Geocoder;
use crate::scratch::ScratchSpace;
use crate::server::{start_server, ServerState, SharedState};
use maps_scraper::MapsClient;
use nominatim_client::NominatimClient;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};

const NOMINATIM_USER_AGENT: &str = "GeocodingAPI/1.0";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let env_filter = EnvFilter::from_default_env().add_directive("geocoding_api=info".parse()?);

    // Use JSON format for GCP Cloud Logging when LOG_FORMAT=json
    if std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false)
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_stackdriver::layer())
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    };

    info!("Starting Geocoding API...");

    let config = Config::from_env();
    info!("Port: {}", config.port);
    info!("Upload dir: {:?}", config.upload_dir);
    info!("Output dir: {:?}", config.output_dir);
    info!("Maps base URL: {}", config.maps_base_url);
    info!("Nominatim URL: {}", config.nominatim_url);
    info!(
        "Batch delays: forward {:?}, reverse {:?}",
        config.forward_delay, config.reverse_delay
    );

    let maps = MapsClient::with_base_url(&config.maps_base_url, config.upstream_timeout)?;
    let nominatim = NominatimClient::with_options(
        &config.nominatim_url,
        NOMINATIM_USER_AGENT,
        config.upstream_timeout,
    )?;

    let scratch = ScratchSpace::new(config.upload_dir.clone(), config.output_dir.clone());
    scratch.prepare().await?;

    let state: SharedState = Arc::new(ServerState::new(
        Geocoder::new(maps, nominatim),
        scratch,
        config.forward_delay,
        config.reverse_delay,
    ));

    // Start HTTP server (blocking)
    start_server(state, config.port).await?;

    Ok(())
}
