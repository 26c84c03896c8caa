//! Driven port resolving free-text addresses to coordinates.
//!
//! Dish creation calls the geocoder before touching storage, so a failure
//! here never leaves partial writes behind. Callers do not retry.

use async_trait::async_trait;

use crate::domain::{Address, Coordinates};

use super::define_port_error;

define_port_error! {
    /// Failures raised by geocoding adapters.
    pub enum GeocodeError {
        /// The provider returned no match for the address.
        NoResults { address: String } => "no location found for address: {address}",
        /// The provider refused the request or reported an error status.
        Provider { status: String, message: String } => "geocoding provider returned {status}: {message}",
        /// The request did not complete within the configured timeout.
        Timeout { message: String } => "geocoding request timed out: {message}",
        /// The request failed before a response was received.
        Transport { message: String } => "geocoding transport failed: {message}",
        /// The response body could not be decoded.
        Decode { message: String } => "geocoding response could not be decoded: {message}",
    }
}

impl GeocodeError {
    /// Stable identifier for the failure kind.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::NoResults { .. } => "no_results",
            Self::Provider { .. } => "provider",
            Self::Timeout { .. } => "timeout",
            Self::Transport { .. } => "transport",
            Self::Decode { .. } => "decode",
        }
    }
}

/// Port for turning an address into a position.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve `address` to coordinates.
    async fn geocode(&self, address: &Address) -> Result<Coordinates, GeocodeError>;
}

/// Offline geocoder returning one fixed position for every address.
///
/// Used when no provider API key is configured.
#[derive(Debug, Clone, Copy)]
pub struct FixtureGeocoder {
    coordinates: Coordinates,
}

impl FixtureGeocoder {
    /// Resolve every address to `coordinates`.
    pub fn new(coordinates: Coordinates) -> Self {
        Self { coordinates }
    }
}

#[async_trait]
impl Geocoder for FixtureGeocoder {
    async fn geocode(&self, _address: &Address) -> Result<Coordinates, GeocodeError> {
        Ok(self.coordinates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn fixture_geocoder_ignores_the_address() {
        let expected = Coordinates::new(51.5, -0.15).expect("coordinates");
        let geocoder = FixtureGeocoder::new(expected);
        let address = Address::new("anywhere").expect("address");

        let resolved = geocoder.geocode(&address).await.expect("fixture resolves");
        assert_eq!(resolved, expected);
    }

    #[rstest]
    #[case(GeocodeError::no_results("x"), "no_results")]
    #[case(GeocodeError::provider("REQUEST_DENIED", "bad key"), "provider")]
    #[case(GeocodeError::timeout("slow"), "timeout")]
    #[case(GeocodeError::transport("refused"), "transport")]
    #[case(GeocodeError::decode("eof"), "decode")]
    fn reasons_are_stable(#[case] error: GeocodeError, #[case] expected: &str) {
        assert_eq!(error.reason(), expected);
    }
}
