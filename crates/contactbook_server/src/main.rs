use std::path::Path;
use std::sync::Arc;

use contactbook_core::{init_logging, SystemClock};
use contactbook_server::config::{ConfigError, ServerConfig, CONFIG_PATH_ENV};
use contactbook_server::{router, AppState, ContactStore};
use log::{info, warn};

#[tokio::main]
async fn main() -> Result<(), ConfigError> {
    let config_path = std::env::var(CONFIG_PATH_ENV).ok();
    let config = match config_path.as_deref() {
        Some(path) => ServerConfig::load(Path::new(path)).await?,
        None => ServerConfig::default(),
    };
    init_logging(&config.logging_options()).map_err(ConfigError::Invalid)?;

    let base_dir = config_path
        .as_deref()
        .and_then(|path| Path::new(path).parent());
    let location = config.database_location(base_dir);
    info!(
        "event=server_start module=http status=ok version={} database={location:?}",
        env!("CARGO_PKG_VERSION")
    );

    let store = ContactStore::open(&location, config.service_options())
        .map_err(|e| ConfigError::Invalid(format!("database open failed: {e}")))?;
    let state = AppState::new(store, Arc::new(SystemClock));

    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("event=server_listen module=http status=ok addr={addr}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ConfigError::Invalid(format!("http server error: {e}")))?;

    info!("event=server_stop module=http status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        warn!("event=shutdown_signal module=http status=error");
        std::future::pending::<()>().await;
    }
}
