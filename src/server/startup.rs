use std::time::Duration;

use tokio::task::JoinHandle;

use crate::server::{
    config::Config, data::store::Store, error::AppError, logging::LogOutputs,
    service::auth::AuthService, util::task::spawn_guarded,
};

/// Interval between store health checks.
const STORE_PING_INTERVAL: Duration = Duration::from_secs(60);

/// Connects to the document store and runs pending migrations.
///
/// Establishes a connection pool from the configured store URL, then runs all
/// pending SeaORM migrations so the documents table exists before the first
/// request. The returned store is scoped to the configured namespace and uses
/// the configured per-call timeout.
///
/// # Arguments
/// - `config` - Application configuration containing the store URL and name
///
/// # Returns
/// - `Ok(Store)` - Connected store with migrations applied
/// - `Err(AppError::DbErr)` - Failed to connect or run migrations
pub async fn connect_to_store(config: &Config) -> Result<Store, AppError> {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    let mut opt = ConnectOptions::new(&config.store_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;

    let store = Store::new(db, config.store_name.clone()).with_timeout(config.store_timeout());
    store.ping().await?;

    tracing::info!(
        "Connected to store '{}' (timeout {:?})",
        store.namespace(),
        store.timeout()
    );

    Ok(store)
}

/// Creates or updates the admin account named in configuration, if any.
///
/// # Returns
/// - `Ok(())` - Account in place, or none configured
/// - `Err(AppError)` - Hashing or store failure
pub async fn ensure_admin(config: &Config, store: &Store) -> Result<(), AppError> {
    let Some(admin) = &config.admin else {
        return Ok(());
    };

    AuthService::new(store)
        .ensure_admin(&admin.email, &admin.password)
        .await?;

    Ok(())
}

/// Adds the configured log folder, if any, to `outputs`.
///
/// # Returns
/// - `Ok(())` - Log folder opened, or none configured
/// - `Err(AppError::IoErr)` - Folder or file could not be created
pub fn setup_log_folder(config: &Config, outputs: &LogOutputs) -> Result<(), AppError> {
    if let Some(folder) = &config.log_folder {
        let path = outputs.set_output_folder(folder, &config.app_name, false)?;
        tracing::info!("Writing logs to {}", path.display());
    }

    Ok(())
}

/// Pings the store periodically and logs when it stops answering.
pub fn spawn_store_monitor(store: Store) -> JoinHandle<Option<()>> {
    spawn_guarded("store monitor", async move {
        let mut interval = tokio::time::interval(STORE_PING_INTERVAL);
        let mut healthy = true;

        loop {
            interval.tick().await;

            match store.ping().await {
                Ok(()) if !healthy => {
                    tracing::info!("Store '{}' reachable again", store.namespace());
                    healthy = true;
                }
                Ok(()) => {}
                Err(e) => {
                    if healthy {
                        tracing::error!("Store '{}' unreachable: {}", store.namespace(), e);
                    }
                    healthy = false;
                }
            }
        }
    })
}
