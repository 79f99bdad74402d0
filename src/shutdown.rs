use tracing::info;

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};
#[cfg(windows)]
use tokio::signal::windows::{ctrl_break, ctrl_c};

/// Resolve once the process is asked to stop, letting the server drain
pub async fn shutdown_signal() {
    let received = wait_for_signal().await;
    info!("Received {}, finishing in-flight requests", received);
}

/// Wait for SIGTERM (container stop) or SIGINT, returning which one arrived
#[cfg(unix)]
async fn wait_for_signal() -> &'static str {
    let mut sigterm = signal(SignalKind::terminate()).expect("Failed to create SIGTERM signal handler");
    let mut sigint = signal(SignalKind::interrupt()).expect("Failed to create SIGINT signal handler");

    tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    }
}

#[cfg(windows)]
async fn wait_for_signal() -> &'static str {
    let mut ctrlc = ctrl_c().expect("Failed to create Ctrl+C signal handler");
    let mut ctrlbreak = ctrl_break().expect("Failed to create Ctrl+Break signal handler");

    tokio::select! {
        _ = ctrlc.recv() => "Ctrl+C",
        _ = ctrlbreak.recv() => "Ctrl+Break",
    }
}
