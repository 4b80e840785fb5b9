use serde::Deserialize;

use crate::format::format_address;

/// Address components returned under `address` by `/reverse?addressdetails=1`.
///
/// Only the keys the formatter consumes are kept; everything else in the
/// payload is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StructuredAddress {
    pub building: Option<String>,
    pub house_number: Option<String>,
    pub road: Option<String>,
    pub neighbourhood: Option<String>,
    pub suburb: Option<String>,
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub postcode: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

/// A successful reverse lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReverseLookup {
    /// Full `display_name` as Nominatim returns it
    pub display_name: String,
    pub address: StructuredAddress,
}

impl ReverseLookup {
    /// Short address built from the components, or `display_name` if none are set
    pub fn formatted_address(&self) -> String {
        format_address(&self.address, &self.display_name)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct NominatimResponse {
    pub(crate) display_name: Option<String>,
    #[serde(default)]
    pub(crate) address: StructuredAddress,
    pub(crate) error: Option<String>,
}
