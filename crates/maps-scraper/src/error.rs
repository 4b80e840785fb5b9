use std::fmt;

/// Errors from the Maps client
#[derive(Debug)]
pub enum MapsError {
    Http(reqwest::Error),
    /// The resolved place URL carried no `/place/<name>/@` segment
    NoPlaceName(String),
}

impl fmt::Display for MapsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(e) => write!(f, "HTTP error: {e}"),
            Self::NoPlaceName(url) => write!(f, "No place name in resolved URL: {url}"),
        }
    }
}

impl std::error::Error for MapsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for MapsError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err)
    }
}

pub type Result<T> = std::result::Result<T, MapsError>;
