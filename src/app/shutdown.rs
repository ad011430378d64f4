use tokio::signal;
#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal as unix_signal};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Cancels `token` on SIGINT (Ctrl+C) or, on unix, SIGTERM.
pub fn spawn_signal_listener(token: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        match wait_for_signal().await {
            Ok(name) => info!("Received {}, initiating graceful shutdown", name),
            Err(err) => {
                error!("Failed to listen for shutdown signals: {}", err);
                return;
            }
        }
        token.cancel();
    })
}

#[cfg(unix)]
async fn wait_for_signal() -> std::io::Result<&'static str> {
    let mut sigterm = unix_signal(SignalKind::terminate())?;

    tokio::select! {
        result = signal::ctrl_c() => result.map(|()| "SIGINT (Ctrl+C)"),
        _ = sigterm.recv() => Ok("SIGTERM"),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> std::io::Result<&'static str> {
    signal::ctrl_c().await.map(|()| "SIGINT (Ctrl+C)")
}
