//! Store connection lifecycle.
//!
//! [`ConnectionManager`] owns the process's single store connection. It opens
//! the connection from a supervised background task that retries on a fixed
//! interval until it succeeds, then pings it on the same interval and starts
//! over if the store goes away. Every state transition is published on a watch
//! channel, and the connection is closed on demand during shutdown.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

use crate::{PoolConfig, StoreError};

/// Fixed delay between connection attempts. There is no backoff and no cap.
pub const RETRY_DELAY: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Connected,
    Error,
    Disconnected,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Connecting => write!(f, "connecting"),
            ConnectionState::Connected => write!(f, "connected"),
            ConnectionState::Error => write!(f, "error"),
            ConnectionState::Disconnected => write!(f, "disconnected"),
        }
    }
}

/// Host and database name logged once a connection is up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreIdentity {
    pub host: String,
    pub database: String,
}

/// Opens and closes connections to a concrete store.
pub trait StoreConnector: Send + Sync + 'static {
    type Handle: Send + Sync + 'static;

    fn connect(&self, uri: &str)
        -> impl Future<Output = Result<Self::Handle, StoreError>> + Send;

    fn identity(&self, handle: &Self::Handle) -> StoreIdentity;

    /// Checks that an open connection still reaches the store.
    fn ping(&self, handle: &Self::Handle)
        -> impl Future<Output = Result<(), StoreError>> + Send;

    fn close(&self, handle: Self::Handle) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Postgres-backed store reached through a sqlx pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct PgConnector {
    pub pool_config: PoolConfig,
}

impl PgConnector {
    #[must_use]
    pub fn new(pool_config: PoolConfig) -> Self {
        Self { pool_config }
    }
}

impl StoreConnector for PgConnector {
    type Handle = PgPool;

    async fn connect(&self, uri: &str) -> Result<PgPool, StoreError> {
        let pool = crate::connect_pool(uri, self.pool_config)
            .await
            .map_err(|e| match e {
                sqlx::Error::Configuration(reason) => StoreError::InvalidUri(reason.to_string()),
                other => StoreError::Sqlx(other),
            })?;
        crate::ping(&pool).await?;
        Ok(pool)
    }

    fn identity(&self, handle: &PgPool) -> StoreIdentity {
        let options = handle.connect_options();
        StoreIdentity {
            host: options.get_host().to_owned(),
            database: options.get_database().unwrap_or("(default)").to_owned(),
        }
    }

    async fn ping(&self, handle: &PgPool) -> Result<(), StoreError> {
        crate::ping(handle).await?;
        Ok(())
    }

    async fn close(&self, handle: PgPool) -> Result<(), StoreError> {
        handle.close().await;
        Ok(())
    }
}

pub struct ConnectionManager<C: StoreConnector> {
    connector: C,
    uri: String,
    retry_delay: Duration,
    state: watch::Sender<ConnectionState>,
    handle: Mutex<Option<C::Handle>>,
    supervisor: Mutex<Option<JoinHandle<()>>>,
}

impl<C: StoreConnector> ConnectionManager<C> {
    #[must_use]
    pub fn new(connector: C, uri: impl Into<String>) -> Self {
        let (state, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            connector,
            uri: uri.into(),
            retry_delay: RETRY_DELAY,
            state,
            handle: Mutex::new(None),
            supervisor: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Starts the background task that connects, retrying every
    /// `retry_delay` until it succeeds, and then watches the connection.
    /// Returns immediately.
    ///
    /// Calling `open` while the task is still alive is a no-op.
    pub async fn open(self: &Arc<Self>) {
        let mut supervisor = self.supervisor.lock().await;
        if supervisor.as_ref().is_some_and(|task| !task.is_finished()) {
            return;
        }

        let manager = Arc::clone(self);
        *supervisor = Some(tokio::spawn(async move {
            manager.supervise().await;
        }));
    }

    /// Subscribes to connection state transitions.
    #[must_use]
    pub fn on_state_change(&self) -> watch::Receiver<ConnectionState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// Stops any pending retry loop and closes the open connection.
    ///
    /// Failures are logged, never returned: shutdown must carry on regardless.
    pub async fn graceful_shutdown(&self, reason: &str) {
        if let Some(task) = self.supervisor.lock().await.take() {
            task.abort();
            // Wait for the task to unwind so it cannot store a handle after we
            // take it below.
            let _ = task.await;
        }

        let handle = self.handle.lock().await.take();
        match handle {
            Some(handle) => match self.connector.close(handle).await {
                Ok(()) => tracing::info!(reason, "store disconnected through {reason}"),
                Err(e) => tracing::error!(error = %e, reason, "error during store disconnection"),
            },
            None => tracing::info!(reason, "no open store connection to close"),
        }

        self.state.send_replace(ConnectionState::Disconnected);
    }

    async fn supervise(&self) {
        loop {
            self.connect_until_ready().await;
            self.watch_until_lost().await;
        }
    }

    /// Pings the open connection every `retry_delay`. Returns once the ping
    /// fails, after the dead handle has been closed and dropped.
    async fn watch_until_lost(&self) {
        loop {
            tokio::time::sleep(self.retry_delay).await;

            let mut slot = self.handle.lock().await;
            let Some(handle) = slot.as_ref() else {
                return;
            };
            let Err(e) = self.connector.ping(handle).await else {
                continue;
            };

            tracing::error!(error = %e, "store connection lost");
            self.state.send_replace(ConnectionState::Error);
            if let Some(handle) = slot.take() {
                if let Err(e) = self.connector.close(handle).await {
                    tracing::warn!(error = %e, "error closing lost store connection");
                }
            }
            tracing::info!("store disconnected, reconnecting");
            self.state.send_replace(ConnectionState::Disconnected);
            return;
        }
    }

    async fn connect_until_ready(&self) {
        loop {
            self.state.send_replace(ConnectionState::Connecting);

            match self.connector.connect(&self.uri).await {
                Ok(handle) => {
                    let identity = self.connector.identity(&handle);
                    tracing::info!(
                        host = %identity.host,
                        database = %identity.database,
                        "store connected successfully"
                    );
                    *self.handle.lock().await = Some(handle);
                    self.state.send_replace(ConnectionState::Connected);
                    return;
                }
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        retry_in_ms = u64::try_from(self.retry_delay.as_millis()).unwrap_or(u64::MAX),
                        "store connection failed"
                    );
                    self.state.send_replace(ConnectionState::Error);
                    tokio::time::sleep(self.retry_delay).await;
                }
            }
        }
    }
}

/// Logs every observed state transition until the manager is dropped.
///
/// A watch channel only keeps the latest value, so a burst of transitions may
/// be logged as its final state.
pub fn spawn_state_logger(mut states: watch::Receiver<ConnectionState>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while states.changed().await.is_ok() {
            let state = *states.borrow_and_update();
            match state {
                ConnectionState::Connected => tracing::info!("store connection established"),
                ConnectionState::Error => tracing::warn!("store connection error"),
                ConnectionState::Disconnected => tracing::info!("store disconnected"),
                ConnectionState::Connecting => tracing::debug!("store connecting"),
            }
        }
    })
}
