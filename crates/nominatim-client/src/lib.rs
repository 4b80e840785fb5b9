//! Nominatim Reverse Geocoding Client
//!
//! A Rust client for the [Nominatim](https://nominatim.org/) reverse geocoding API,
//! plus a formatter that turns the structured `address` object into a short,
//! human-ordered address line.

mod client;
mod error;
mod format;
mod types;

pub use client::NominatimClient;
pub use error::{NominatimError, Result};
pub use format::format_address;
pub use types::{ReverseLookup, StructuredAddress};
