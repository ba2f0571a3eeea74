// Signal handling module
//
// Supported signals:
// - SIGTERM: Graceful shutdown
// - SIGINT:  Graceful shutdown (Ctrl+C)

use std::sync::Arc;
use tokio::sync::Notify;

/// Start signal handlers (Unix)
///
/// Registers SIGTERM and SIGINT, then spawns a task that notifies `shutdown`
/// when either arrives. Must be called from inside the Tokio runtime.
#[cfg(unix)]
pub fn start_signal_handler(shutdown: Arc<Notify>) -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    tokio::spawn(async move {
        tokio::select! {
            _ = sigterm.recv() => log::info!("SIGTERM received, initiating graceful shutdown"),
            _ = sigint.recv() => log::info!("SIGINT received, initiating graceful shutdown"),
        }
        shutdown.notify_one();
    });

    log::debug!("Signal handlers registered (pid {})", std::process::id());
    Ok(())
}

/// Fallback for other platforms - only handles Ctrl+C
#[cfg(not(unix))]
pub fn start_signal_handler(shutdown: Arc<Notify>) -> std::io::Result<()> {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                log::info!("Ctrl+C received, initiating graceful shutdown");
                shutdown.notify_one();
            }
            Err(e) => log::error!("Failed to listen for Ctrl+C: {e}"),
        }
    });
    Ok(())
}
