//! Operator interrupts.

use std::future::Future;
use tokio::signal;
use tracing::{info, warn};

/// Returns a future that resolves once the operator asks the streamer to stop.
///
/// The handlers are installed when this is called, not when the future is
/// first polled, so an interrupt that lands during connect or the first tick
/// is still caught. Must be called from inside the runtime.
///
/// Listens for SIGINT and SIGTERM on Unix and Ctrl+C on Windows. If the
/// handlers cannot be installed the future never resolves, so the stream only
/// ends on an error.
#[cfg(unix)]
pub fn shutdown_signal() -> impl Future<Output = ()> {
    use signal::unix::{signal, SignalKind};

    let handlers = signal(SignalKind::interrupt())
        .and_then(|sigint| signal(SignalKind::terminate()).map(|sigterm| (sigint, sigterm)));

    async move {
        match handlers {
            Ok((mut sigint, mut sigterm)) => {
                tokio::select! {
                    _ = sigint.recv() => info!("received SIGINT"),
                    _ = sigterm.recv() => info!("received SIGTERM"),
                }
            }
            Err(err) => {
                warn!(error = %err, "could not install signal handlers");
                std::future::pending::<()>().await;
            }
        }
    }
}

#[cfg(windows)]
pub fn shutdown_signal() -> impl Future<Output = ()> {
    let handler = signal::windows::ctrl_c();

    async move {
        match handler {
            Ok(mut ctrl_c) => {
                ctrl_c.recv().await;
                info!("received Ctrl+C");
            }
            Err(err) => {
                warn!(error = %err, "could not listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        }
    }
}
