use std::fmt;

/// A WGS84 latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Build a coordinate, rejecting values outside [-90, 90] / [-180, 180]
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        if (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude) {
            Some(Self {
                latitude,
                longitude,
            })
        } else {
            None
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}",
            format_degrees(self.latitude),
            format_degrees(self.longitude)
        )
    }
}

/// Text form of a degree value used in responses, links and CSV cells.
///
/// Whole numbers keep their `.0` (`28.0`, not `28`), magnitudes below 1e-4
/// use a two-digit exponent (`5e-05`), and non-finite values print as
/// `nan`/`inf`/`-inf`.
pub fn format_degrees(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let magnitude = value.abs();
    if magnitude != 0.0 && magnitude < 1e-4 {
        let sci = format!("{:e}", value);
        if let Some((mantissa, exp)) = sci.split_once('e') {
            if let Ok(exp) = exp.parse::<i32>() {
                let sign = if exp < 0 { '-' } else { '+' };
                return format!("{}e{}{:02}", mantissa, sign, exp.abs());
            }
        }
        return sci;
    }

    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

/// Result of a single forward search against the Maps web UI
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Coordinates were extracted; `url` is the final redirected search URL
    Found { coordinate: Coordinate, url: String },
    /// Nothing matched. `details` is the resolved URL when the request
    /// succeeded, or the transport error text when it did not.
    NotFound { details: String },
}

impl SearchOutcome {
    pub fn coordinate(&self) -> Option<Coordinate> {
        match self {
            Self::Found { coordinate, .. } => Some(*coordinate),
            Self::NotFound { .. } => None,
        }
    }
}

/// A place name recovered from a `/maps/place/<name>/@...` redirect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceMatch {
    pub name: String,
    pub url: String,
}
