//! Coordinate extraction from Maps URLs and page HTML
//!
//! Patterns are tried in a fixed order and the first one whose first match
//! parses to an in-range pair wins. A match that is out of range does not
//! fall through to later matches of the same pattern, only to the next
//! pattern.

use crate::types::Coordinate;
use regex::Regex;
use std::sync::LazyLock;

/// `@lat,lng` as in `/maps/place/Foo/@28.43,77.03,17z`
static AT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@(-?\d+\.\d+),(-?\d+\.\d+)").unwrap());

/// `!3dlat!4dlng` from the data= segment of place URLs
static DATA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!3d(-?\d+\.\d+)!4d(-?\d+\.\d+)").unwrap());

/// Embedded viewport array in the APP_INITIALIZATION_STATE blob
static EMBEDDED_ARRAY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\[\d+,"[-\w]+",\d+,\d+,null,null,(-?\d+\.\d+),(-?\d+\.\d+)\]"#).unwrap()
});

static QUOTED_PAIR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""(-?\d+\.\d+),(-?\d+\.\d+)""#).unwrap());

static CENTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"center=(-?\d+\.\d+),(-?\d+\.\d+)").unwrap());

/// Extract coordinates from a resolved URL, falling back to the page body
pub fn extract_coordinates(url: &str, html: Option<&str>) -> Option<Coordinate> {
    extract_from_url(url).or_else(|| html.and_then(extract_from_html))
}

/// Try the URL patterns: `@lat,lng`, then `!3dlat!4dlng`
pub fn extract_from_url(url: &str) -> Option<Coordinate> {
    [&*AT_RE, &*DATA_RE]
        .into_iter()
        .find_map(|re| first_match(re, url))
}

/// Try the HTML patterns, most specific first
pub fn extract_from_html(html: &str) -> Option<Coordinate> {
    [
        &*EMBEDDED_ARRAY_RE,
        &*QUOTED_PAIR_RE,
        &*CENTER_RE,
        &*AT_RE,
        &*DATA_RE,
    ]
    .into_iter()
    .find_map(|re| first_match(re, html))
}

fn first_match(re: &Regex, haystack: &str) -> Option<Coordinate> {
    let caps = re.captures(haystack)?;
    let latitude = caps[1].parse::<f64>().ok()?;
    let longitude = caps[2].parse::<f64>().ok()?;
    Coordinate::new(latitude, longitude)
}
