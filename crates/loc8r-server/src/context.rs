use std::sync::Arc;

use loc8r_core::AppConfig;
use loc8r_db::{spawn_state_logger, ConnectionManager, PgConnector, PoolConfig, StoreConnector};

use crate::shutdown::ShutdownSignal;

/// Process-wide resources owned by `main` for the lifetime of the server.
pub struct AppContext<C: StoreConnector = PgConnector> {
    store: Option<Arc<ConnectionManager<C>>>,
}

impl AppContext<PgConnector> {
    /// Starts the store connection manager when a store URI is configured.
    ///
    /// Returns immediately; the first connection attempt and any retries run
    /// in the background.
    pub async fn start(config: &AppConfig) -> Self {
        let store = match config.store_uri.as_deref() {
            Some(uri) => {
                let connector = PgConnector::new(PoolConfig::from_app_config(config));
                Some(Arc::new(ConnectionManager::new(connector, uri)))
            }
            None => {
                tracing::warn!("MONGODB_URI not set; store connection disabled");
                None
            }
        };
        Self::with_store(store).await
    }
}

impl<C: StoreConnector> AppContext<C> {
    async fn with_store(store: Option<Arc<ConnectionManager<C>>>) -> Self {
        if let Some(manager) = &store {
            let _logger = spawn_state_logger(manager.on_state_change());
            manager.open().await;
        }
        Self { store }
    }

    /// Closes the store connection, if any, tagging the log with the signal's
    /// reason.
    pub async fn shutdown(&self, signal: ShutdownSignal) {
        if let Some(manager) = &self.store {
            manager.graceful_shutdown(signal.reason()).await;
        }
    }
}
