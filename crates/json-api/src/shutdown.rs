//! Stop the server when the process is asked to terminate.

use std::{fmt, io, time::Duration};

use salvo::server::ServerHandle;
use thiserror::Error;
use tokio::signal;
use tracing::info;

#[derive(Debug, Error)]
#[error("failed to install {signal} handler: {source}")]
pub(crate) struct ShutdownSignalError {
    signal: ShutdownSignal,

    #[source]
    source: io::Error,
}

/// The signal that ended the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ShutdownSignal {
    Interrupt,
    Terminate,
}

impl fmt::Display for ShutdownSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Interrupt => "SIGINT",
            Self::Terminate => "SIGTERM",
        })
    }
}

impl ShutdownSignal {
    fn install_error(self, source: io::Error) -> ShutdownSignalError {
        ShutdownSignalError {
            signal: self,
            source,
        }
    }
}

#[cfg(unix)]
async fn terminate() -> Result<(), ShutdownSignalError> {
    signal::unix::signal(signal::unix::SignalKind::terminate())
        .map_err(|source| ShutdownSignal::Terminate.install_error(source))?
        .recv()
        .await;

    Ok(())
}

#[cfg(not(unix))]
async fn terminate() -> Result<(), ShutdownSignalError> {
    std::future::pending().await
}

/// Resolve with whichever termination signal arrives first.
pub(crate) async fn wait() -> Result<ShutdownSignal, ShutdownSignalError> {
    tokio::select! {
        result = signal::ctrl_c() => {
            result.map_err(|source| ShutdownSignal::Interrupt.install_error(source))?;

            Ok(ShutdownSignal::Interrupt)
        }
        result = terminate() => {
            result?;

            Ok(ShutdownSignal::Terminate)
        }
    }
}

/// Wait for a termination signal, then let in-flight cart requests finish
/// for at most `drain` before the server stops.
pub(crate) async fn listen(handle: ServerHandle, drain: Duration) -> Result<(), ShutdownSignalError> {
    let signal = wait().await?;

    info!(%signal, drain_secs = drain.as_secs(), "draining in-flight requests");

    handle.stop_graceful(Some(drain));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signals_display_their_posix_names() {
        assert_eq!(ShutdownSignal::Interrupt.to_string(), "SIGINT");
        assert_eq!(ShutdownSignal::Terminate.to_string(), "SIGTERM");
    }

    #[test]
    fn install_errors_name_the_signal() {
        let error = ShutdownSignal::Terminate.install_error(io::Error::other("no handler"));

        assert_eq!(error.to_string(), "failed to install SIGTERM handler: no handler");
    }
}
