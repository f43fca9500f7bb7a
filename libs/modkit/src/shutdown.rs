use anyhow::Result;
use tokio_util::sync::CancellationToken;

/// Resolve on SIGTERM/SIGINT (Ctrl+C on Windows) or when `cancel` fires,
/// whichever comes first. The token is cancelled on return so every task
/// holding a child token observes the shutdown.
pub async fn wait_for_shutdown(cancel: CancellationToken) -> Result<()> {
    let outcome = tokio::select! {
        res = os_signal() => res,
        _ = cancel.cancelled() => Ok(()),
    };
    cancel.cancel();
    outcome
}

#[cfg(unix)]
async fn os_signal() -> Result<()> {
    use tokio::signal::unix::{signal, SignalKind};
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    tokio::select! {
        _ = sigterm.recv() => tracing::info!("shutdown: SIGTERM received"),
        _ = sigint.recv()  => tracing::info!("shutdown: SIGINT received"),
    }
    Ok(())
}

#[cfg(not(unix))]
async fn os_signal() -> Result<()> {
    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown: Ctrl+C received");
    Ok(())
}
