//! Embedded PostgreSQL bootstrap for Diesel adapter tests.
//!
//! Every test gets its own temporary database on a process-wide cluster,
//! migrated with the crate's embedded migrations.

use std::time::Duration;

use dishshare::outbound::persistence::run_migrations;
use pg_embedded_setup_unpriv::{BootstrapResult, ClusterHandle, TemporaryDatabase};
use tokio::runtime::Runtime;

const SHARED_CLUSTER_RETRIES: usize = 5;
const SHARED_CLUSTER_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Returns the shared cluster handle, retrying transient bootstrap failures.
pub fn shared_cluster_handle() -> BootstrapResult<&'static ClusterHandle> {
    ensure_stable_password();
    let mut attempt = 1;
    loop {
        match pg_embedded_setup_unpriv::test_support::shared_cluster_handle() {
            Ok(handle) => return Ok(handle),
            Err(error) => {
                if attempt >= SHARED_CLUSTER_RETRIES {
                    return Err(error);
                }
                std::thread::sleep(SHARED_CLUSTER_RETRY_DELAY);
                attempt += 1;
            }
        }
    }
}

/// Creates a fresh database on `cluster` and applies every migration to it.
pub fn migrated_database(
    runtime: &Runtime,
    cluster: &ClusterHandle,
) -> Result<TemporaryDatabase, String> {
    let name = format!("dishshare_test_{}", uuid::Uuid::new_v4().simple());
    let database = cluster
        .temporary_database(name.as_str())
        .map_err(|error| format!("create temporary database: {error:?}"))?;
    let url = database.url().to_string();
    runtime
        .block_on(run_migrations(&url))
        .map_err(|error| format!("apply migrations: {error}"))?;
    Ok(database)
}

/// Pins `PG_PASSWORD` so a reused data directory keeps accepting logins.
///
/// `postgresql_embedded` generates a random password per settings instance,
/// but `initdb` only runs once per data directory.
fn ensure_stable_password() {
    if std::env::var_os("PG_PASSWORD").is_none() {
        // SAFETY: runs before the cluster bootstrap spawns any threads and
        // at most once per process behind the shared cluster singleton.
        unsafe {
            std::env::set_var("PG_PASSWORD", "dishshare_embedded_test");
        }
    }
}
