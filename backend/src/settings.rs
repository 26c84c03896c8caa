//! Application settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `DISHSHARE_*` environment variables or a
//! configuration file. Numeric limits carry OrthoConfig defaults; the
//! remaining accessors fall back to built-in values.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_GEOCODER_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/geocode/json";
const DEFAULT_GEOCODER_TIMEOUT_SECS: u64 = 5;

/// Errors raised when a configured value cannot be interpreted.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("invalid geocoder endpoint '{value}': {source}")]
    GeocoderEndpoint {
        value: String,
        #[source]
        source: url::ParseError,
    },
}

/// Runtime configuration for the dish service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "DISHSHARE")]
pub struct AppSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; without it dishes live in memory.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    #[ortho_config(default = DEFAULT_POOL_MAX_SIZE)]
    pub pool_max_size: u32,
    /// Geocoding endpoint accepting `address` and `key` query parameters.
    pub geocoder_endpoint: Option<String>,
    /// API key for the geocoding provider; without it every address
    /// resolves to the origin.
    pub geocoder_api_key: Option<String>,
    /// Per-request timeout for geocoding calls, in seconds.
    #[ortho_config(default = DEFAULT_GEOCODER_TIMEOUT_SECS)]
    pub geocoder_timeout_secs: u64,
    /// Directory uploaded images are stored in.
    pub uploads_dir: Option<PathBuf>,
}

impl AppSettings {
    /// Parse the bind address, falling back to all interfaces on port 8080.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// Parse the geocoding endpoint, falling back to the Google Geocoding API.
    pub fn geocoder_endpoint(&self) -> Result<Url, SettingsError> {
        let value = self
            .geocoder_endpoint
            .as_deref()
            .unwrap_or(DEFAULT_GEOCODER_ENDPOINT);
        Url::parse(value).map_err(|source| SettingsError::GeocoderEndpoint {
            value: value.to_owned(),
            source,
        })
    }

    /// Return the geocoding timeout as a [`Duration`].
    pub fn geocoder_timeout(&self) -> Duration {
        Duration::from_secs(self.geocoder_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings loading and defaults.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 7] = [
        "DISHSHARE_BIND_ADDR",
        "DISHSHARE_DATABASE_URL",
        "DISHSHARE_POOL_MAX_SIZE",
        "DISHSHARE_GEOCODER_ENDPOINT",
        "DISHSHARE_GEOCODER_API_KEY",
        "DISHSHARE_GEOCODER_TIMEOUT_SECS",
        "DISHSHARE_UPLOADS_DIR",
    ];

    fn load() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("dishshare")]).expect("settings should load")
    }

    #[rstest]
    fn defaults_apply_when_nothing_is_set() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load();
        assert_eq!(
            settings.bind_addr().expect("default bind address"),
            DEFAULT_BIND_ADDR.parse::<SocketAddr>().expect("literal")
        );
        assert!(settings.database_url.is_none());
        assert_eq!(settings.pool_max_size, DEFAULT_POOL_MAX_SIZE);
        assert_eq!(
            settings.geocoder_endpoint().expect("default endpoint").as_str(),
            DEFAULT_GEOCODER_ENDPOINT
        );
        assert_eq!(settings.geocoder_timeout(), Duration::from_secs(5));
        assert!(settings.uploads_dir.is_none());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("DISHSHARE_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            (
                "DISHSHARE_DATABASE_URL",
                Some("postgres://localhost/dishes".to_owned()),
            ),
            ("DISHSHARE_POOL_MAX_SIZE", Some("3".to_owned())),
            (
                "DISHSHARE_GEOCODER_ENDPOINT",
                Some("http://localhost:8089/geocode".to_owned()),
            ),
            ("DISHSHARE_GEOCODER_API_KEY", Some("secret".to_owned())),
            ("DISHSHARE_GEOCODER_TIMEOUT_SECS", Some("2".to_owned())),
            ("DISHSHARE_UPLOADS_DIR", Some("/srv/uploads".to_owned())),
        ]);

        let settings = load();
        assert_eq!(
            settings.bind_addr().expect("bind address"),
            "127.0.0.1:9000".parse::<SocketAddr>().expect("literal")
        );
        assert_eq!(
            settings.database_url.as_deref(),
            Some("postgres://localhost/dishes")
        );
        assert_eq!(settings.pool_max_size, 3);
        assert_eq!(
            settings.geocoder_endpoint().expect("endpoint").host_str(),
            Some("localhost")
        );
        assert_eq!(settings.geocoder_api_key.as_deref(), Some("secret"));
        assert_eq!(settings.geocoder_timeout(), Duration::from_secs(2));
        assert_eq!(settings.uploads_dir, Some(PathBuf::from("/srv/uploads")));
    }

    #[rstest]
    fn database_url_alone_is_enough_to_load() {
        let mut vars = VARS.map(|name| (name, None::<String>));
        vars[1].1 = Some("postgres://localhost/dishes".to_owned());
        let _guard = lock_env(vars);

        let settings = load();
        assert_eq!(
            settings.database_url.as_deref(),
            Some("postgres://localhost/dishes")
        );
        assert_eq!(settings.pool_max_size, DEFAULT_POOL_MAX_SIZE);
        assert_eq!(
            settings.geocoder_timeout(),
            Duration::from_secs(DEFAULT_GEOCODER_TIMEOUT_SECS)
        );
    }

    #[rstest]
    fn malformed_bind_address_is_reported() {
        let _guard = lock_env([("DISHSHARE_BIND_ADDR", Some("not an address".to_owned()))]);

        let error = load().bind_addr().expect_err("bind address should be rejected");
        assert!(matches!(error, SettingsError::BindAddr { .. }));
    }
}
