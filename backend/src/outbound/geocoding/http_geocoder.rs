//! Reqwest-backed geocoder adapter.
//!
//! Speaks the Google Maps geocoding JSON contract. This adapter owns
//! transport details only: query encoding, timeout and HTTP error mapping,
//! and decoding the first result into domain coordinates.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use zeroize::Zeroizing;

use super::dto::GeocodeResponseDto;
use crate::domain::ports::{GeocodeError, Geocoder};
use crate::domain::{Address, Coordinates};

const STATUS_OK: &str = "OK";
const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";

/// Geocoder that issues `GET {endpoint}?address=..&key=..` requests.
pub struct HttpGeocoder {
    client: Client,
    endpoint: Url,
    api_key: Zeroizing<String>,
}

impl HttpGeocoder {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key: Zeroizing::new(api_key.into()),
        })
    }
}

#[async_trait]
impl Geocoder for HttpGeocoder {
    async fn geocode(&self, address: &Address) -> Result<Coordinates, GeocodeError> {
        let address_text: &str = address.as_ref();
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[("address", address_text), ("key", self.api_key.as_str())])
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        parse_coordinates(address, body.as_ref())
    }
}

fn parse_coordinates(address: &Address, body: &[u8]) -> Result<Coordinates, GeocodeError> {
    let decoded: GeocodeResponseDto = serde_json::from_slice(body).map_err(|error| {
        GeocodeError::decode(format!("invalid geocoding JSON payload: {error}"))
    })?;

    match decoded.status.as_str() {
        STATUS_OK => {}
        STATUS_ZERO_RESULTS => return Err(GeocodeError::no_results(address.to_string())),
        other => {
            let message = decoded
                .error_message
                .unwrap_or_else(|| "no error message".to_owned());
            return Err(GeocodeError::provider(other, message));
        }
    }

    let Some(first) = decoded.results.into_iter().next() else {
        return Err(GeocodeError::no_results(address.to_string()));
    };
    let location = first.geometry.location;
    Coordinates::new(location.lat, location.lng)
        .map_err(|error| GeocodeError::decode(format!("provider returned {error}")))
}

fn map_transport_error(error: reqwest::Error) -> GeocodeError {
    // reqwest includes the request URL, which carries the API key.
    let error = error.without_url();
    if error.is_timeout() {
        GeocodeError::timeout(error.to_string())
    } else {
        GeocodeError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> GeocodeError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => GeocodeError::timeout(message),
        _ if status.is_client_error() => GeocodeError::provider(status.as_str(), message),
        _ => GeocodeError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
