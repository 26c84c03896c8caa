//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use dishshare::domain::DevAccount;
use dishshare::domain::ports::{Geocoder, ImageStore};
use dishshare::inbound::http::session_config::SessionSettings;
use dishshare::outbound::memory::MemoryStore;
use dishshare::outbound::persistence::DbPool;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

/// Where dishes and users are stored.
#[derive(Clone)]
pub enum Storage {
    Postgres(DbPool),
    Memory(Arc<MemoryStore>),
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) storage: Storage,
    pub(crate) geocoder: Arc<dyn Geocoder>,
    pub(crate) images: Arc<dyn ImageStore>,
    pub(crate) accounts: Vec<DevAccount>,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Configuration backed by the in-memory store with no login accounts.
    #[must_use]
    pub fn new(
        session: SessionSettings,
        bind_addr: SocketAddr,
        geocoder: Arc<dyn Geocoder>,
        images: Arc<dyn ImageStore>,
    ) -> Self {
        Self {
            session,
            bind_addr,
            storage: Storage::Memory(Arc::new(MemoryStore::new())),
            geocoder,
            images,
            accounts: Vec::new(),
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Store dishes and users in PostgreSQL.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.storage = Storage::Postgres(pool);
        self
    }

    /// Accounts accepted by `POST /api/v1/login`.
    #[must_use]
    pub fn with_accounts(mut self, accounts: Vec<DevAccount>) -> Self {
        self.accounts = accounts;
        self
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}
