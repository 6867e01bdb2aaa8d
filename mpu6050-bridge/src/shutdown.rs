//! Ctrl+C handling.

use std::future::Future;

use tokio::signal::unix::{SignalKind, signal};

/// Install the SIGINT listener and return a future that completes on the
/// first interrupt.
///
/// The handler is registered before this returns, so an interrupt that
/// arrives before the future is first polled is still observed.
pub fn interrupt() -> std::io::Result<impl Future<Output = ()>> {
    let mut sigint = signal(SignalKind::interrupt())?;

    Ok(async move {
        match sigint.recv().await {
            Some(()) => tracing::info!("Received shutdown signal"),
            None => {
                tracing::error!("SIGINT listener closed");
                std::future::pending::<()>().await;
            }
        }
    })
}
