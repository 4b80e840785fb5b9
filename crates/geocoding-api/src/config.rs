use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Service configuration parsed from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub upload_dir: PathBuf,
    pub output_dir: PathBuf,
    pub maps_base_url: String,
    pub nominatim_url: String,
    pub forward_delay: Duration,
    pub reverse_delay: Duration,
    pub upstream_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            upload_dir: PathBuf::from("uploads"),
            output_dir: PathBuf::from("outputs"),
            maps_base_url: "https://www.google.com".to_string(),
            nominatim_url: "https://nominatim.openstreetmap.org".to_string(),
            forward_delay: Duration::from_millis(500),
            // Nominatim usage policy: at most 1 request per second
            reverse_delay: Duration::from_millis(1000),
            upstream_timeout: Duration::from_secs(10),
        }
    }
}

impl Config {
    /// Parse configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);

        let upload_dir = env::var("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.upload_dir);

        let output_dir = env::var("OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.output_dir);

        let maps_base_url = env::var("MAPS_BASE_URL").unwrap_or(defaults.maps_base_url);

        let nominatim_url = env::var("NOMINATIM_URL").unwrap_or(defaults.nominatim_url);

        let forward_delay = millis_var("FORWARD_DELAY_MS").unwrap_or(defaults.forward_delay);
        let reverse_delay = millis_var("REVERSE_DELAY_MS").unwrap_or(defaults.reverse_delay);

        let upstream_timeout = env::var("UPSTREAM_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.upstream_timeout);

        Self {
            port,
            upload_dir,
            output_dir,
            maps_base_url,
            nominatim_url,
            forward_delay,
            reverse_delay,
            upstream_timeout,
        }
    }
}

fn millis_var(name: &str) -> Option<Duration> {
    env::var(name)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}
