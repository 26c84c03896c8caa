//! Geocoding outbound adapters.
//!
//! Provides an HTTP implementation of the `Geocoder` port.

mod dto;
mod http_geocoder;

pub use http_geocoder::HttpGeocoder;
