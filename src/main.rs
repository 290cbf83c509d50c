use std::net::SocketAddr;

use turtle::server::{
    config::Config,
    error::AppError,
    logging::{self, LogOutputs},
    router, startup,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    let outputs = LogOutputs::new();
    logging::init_tracing(outputs.clone())?;

    let config = Config::from_env().inspect_err(|e| logging::log_error_stack(e))?;
    startup::setup_log_folder(&config, &outputs)?;

    let store = startup::connect_to_store(&config).await?;
    startup::ensure_admin(&config, &store).await?;

    let api_keys = config.api_key_registry();
    tracing::info!("Loaded {} API key(s)", api_keys.len());
    tracing::warn!("Requests from localhost bypass API key and session checks");

    let monitor = startup::spawn_store_monitor(store.clone());

    let state = AppState::new(store.clone(), api_keys, config.cookie_secure);
    let app = router::router(state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(config.address()).await?;
    tracing::info!("Listening on {}", config.url());

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    monitor.abort();
    store.close().await?;
    outputs.close();

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}
