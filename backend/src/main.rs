//! Dishshare entry point: loads settings, wires adapters and serves HTTP.

mod server;

use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use dishshare::domain::ports::{FixtureGeocoder, Geocoder, ImageStore, RetainingImageStore};
use dishshare::domain::{Coordinates, DevAccount};
use dishshare::inbound::http::health::HealthState;
use dishshare::inbound::http::session_config::{BuildMode, session_settings_from_env};
use dishshare::outbound::geocoding::HttpGeocoder;
use dishshare::outbound::images::FsImageStore;
use dishshare::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use dishshare::settings::AppSettings;
use server::ServerConfig;

fn build_geocoder(settings: &AppSettings) -> Result<Arc<dyn Geocoder>> {
    match settings.geocoder_api_key.as_deref() {
        Some(key) => {
            let geocoder = HttpGeocoder::new(
                settings.geocoder_endpoint()?,
                key,
                settings.geocoder_timeout(),
            )
            .wrap_err("build geocoder client")?;
            Ok(Arc::new(geocoder))
        }
        None => {
            warn!("no geocoder API key configured; every address resolves to the origin");
            Ok(Arc::new(FixtureGeocoder::new(Coordinates::new(0.0, 0.0)?)))
        }
    }
}

fn build_image_store(settings: &AppSettings) -> Result<Arc<dyn ImageStore>> {
    match settings.uploads_dir.as_deref() {
        Some(dir) => {
            let store = FsImageStore::open(dir)
                .wrap_err_with(|| format!("open uploads directory {}", dir.display()))?;
            Ok(Arc::new(store))
        }
        None => {
            warn!("no uploads directory configured; images are never removed");
            Ok(Arc::new(RetainingImageStore))
        }
    }
}

#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(%error, "tracing init failed");
    }

    let settings = AppSettings::load().wrap_err("load settings")?;
    let env = DefaultEnv::new();
    let session = session_settings_from_env(&env, BuildMode::from_debug_assertions())
        .wrap_err("session configuration")?;

    let mut config = ServerConfig::new(
        session,
        settings.bind_addr()?,
        build_geocoder(&settings)?,
        build_image_store(&settings)?,
    )
    .with_accounts(vec![DevAccount::admin()?]);

    if let Some(database_url) = settings.database_url.as_deref() {
        run_migrations(database_url)
            .await
            .wrap_err("apply database migrations")?;
        let pool = DbPool::new(
            PoolConfig::new(database_url).with_max_size(settings.pool_max_size),
        )
        .await
        .wrap_err("build database pool")?;
        config = config.with_db_pool(pool);
    } else {
        info!("no database URL configured; using in-memory storage");
    }

    #[cfg(feature = "metrics")]
    {
        config = config.with_metrics(Some(server::make_metrics()?));
    }

    let health_state = web::Data::new(HealthState::new());
    server::create_server(health_state, config)?.await?;
    Ok(())
}
