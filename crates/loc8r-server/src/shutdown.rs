//! Process signal handling.
//!
//! Every handled signal ends the process the same way: the HTTP server drains,
//! the store connection is closed, and the process ends the way the signal
//! asks for. A restart re-raises `SIGUSR2` so the supervising reloader sees
//! the process die by the signal it sent.

use std::fmt;

/// A termination request received from the operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    /// `SIGUSR2`, sent by development reloaders before restarting the process.
    Restart,
    /// `SIGINT`, or Ctrl-C on platforms without unix signals.
    Interrupt,
    /// `SIGTERM`, sent by hosting platforms on shutdown.
    Terminate,
}

impl ShutdownSignal {
    /// Text attached to the store disconnect log line.
    #[must_use]
    pub fn reason(self) -> &'static str {
        match self {
            ShutdownSignal::Restart => "restart",
            ShutdownSignal::Interrupt => "app termination",
            ShutdownSignal::Terminate => "platform shutdown",
        }
    }

    /// Exit status used when the signal cannot be handed back to the
    /// supervisor: 128 + 12 for a restart, 0 otherwise.
    #[must_use]
    pub fn exit_code(self) -> i32 {
        match self {
            ShutdownSignal::Restart => 140,
            ShutdownSignal::Interrupt | ShutdownSignal::Terminate => 0,
        }
    }
}

impl fmt::Display for ShutdownSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShutdownSignal::Restart => write!(f, "SIGUSR2"),
            ShutdownSignal::Interrupt => write!(f, "SIGINT"),
            ShutdownSignal::Terminate => write!(f, "SIGTERM"),
        }
    }
}

/// Resolves with the first handled signal.
///
/// A handler that fails to install is logged and never fires; the remaining
/// handlers keep working.
pub async fn wait_for_signal() -> ShutdownSignal {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for interrupt signal");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = unix_signal(tokio::signal::unix::SignalKind::terminate());
    #[cfg(unix)]
    let restart = unix_signal(tokio::signal::unix::SignalKind::user_defined2());

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();
    #[cfg(not(unix))]
    let restart = std::future::pending::<()>();

    let signal = tokio::select! {
        () = interrupt => ShutdownSignal::Interrupt,
        () = terminate => ShutdownSignal::Terminate,
        () = restart => ShutdownSignal::Restart,
    };

    tracing::info!(%signal, "received shutdown signal, starting graceful shutdown");
    signal
}

/// Ends the process after a restart request by re-raising `SIGUSR2` with its
/// default action. Falls back to exiting with [`ShutdownSignal::exit_code`]
/// where that is not possible.
pub fn hand_back_restart() -> ! {
    #[cfg(unix)]
    if let Err(e) = signal_hook::low_level::emulate_default_handler(signal_hook::consts::SIGUSR2) {
        tracing::error!(error = %e, "failed to re-raise SIGUSR2");
    }
    std::process::exit(ShutdownSignal::Restart.exit_code())
}

#[cfg(unix)]
async fn unix_signal(kind: tokio::signal::unix::SignalKind) {
    match tokio::signal::unix::signal(kind) {
        Ok(mut stream) => {
            stream.recv().await;
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to install signal handler");
            std::future::pending::<()>().await;
        }
    }
}
