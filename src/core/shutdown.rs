//! # Termination signals.
//!
//! [`wait_for_shutdown_signal`] resolves with the name of the first
//! termination signal received, which ends up as the reason of the
//! `ShutdownRequested` event.
//!
//! | Platform | Signals                               |
//! |----------|---------------------------------------|
//! | unix     | `SIGINT`, `SIGTERM`, `SIGQUIT`        |
//! | other    | Ctrl-C via [`tokio::signal::ctrl_c`]  |

use std::io;

/// Waits for a termination signal and returns its name.
///
/// Listeners are installed on every call. Fails if one cannot be installed.
#[cfg(unix)]
pub async fn wait_for_shutdown_signal() -> io::Result<&'static str> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigquit = signal(SignalKind::quit())?;

    let name = tokio::select! {
        _ = sigint.recv()  => "SIGINT",
        _ = sigterm.recv() => "SIGTERM",
        _ = sigquit.recv() => "SIGQUIT",
    };
    Ok(name)
}

/// Waits for a termination signal and returns its name.
#[cfg(not(unix))]
pub async fn wait_for_shutdown_signal() -> io::Result<&'static str> {
    tokio::signal::ctrl_c().await?;
    Ok("ctrl-c")
}
