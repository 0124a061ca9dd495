mod context;
mod middleware;
mod pages;
mod shutdown;
mod views;

use tokio::sync::oneshot;
use tracing_subscriber::EnvFilter;

use crate::{
    context::AppContext,
    pages::{build_app, AppState},
    shutdown::ShutdownSignal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = loc8r_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(env = %config.env, api_base = %config.api_base, "starting loc8r-server");

    let api = loc8r_api_client::LocationsClient::new(&config.api_base, config.api_timeout_secs)?;
    let context = AppContext::start(&config).await;
    let app = build_app(AppState {
        api,
        google_api_key: config.google_api_key.clone(),
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");

    let (signal_tx, signal_rx) = oneshot::channel();
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let signal = shutdown::wait_for_signal().await;
            let _ = signal_tx.send(signal);
        })
        .await;

    // The store is closed on every exit path, including a server error.
    let signal = signal_rx.await.ok();
    context
        .shutdown(signal.unwrap_or(ShutdownSignal::Terminate))
        .await;
    served?;

    if signal == Some(ShutdownSignal::Restart) {
        shutdown::hand_back_restart();
    }
    Ok(())
}
