//! Shutdown signals and the command channel of the resident service

use tokio::sync::mpsc;
use tracing::info;

use crate::infrastructure::HotkeyAction;

/// Commands handled by the service loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceSignal {
    /// Run one correction workflow
    Trigger,
    /// Show or hide the text panel
    TogglePanel,
    /// Stop the service (SIGINT/SIGTERM)
    Shutdown,
}

impl From<HotkeyAction> for ServiceSignal {
    fn from(action: HotkeyAction) -> Self {
        match action {
            HotkeyAction::Correct => Self::Trigger,
            HotkeyAction::TogglePanel => Self::TogglePanel,
        }
    }
}

/// Service signal handler
///
/// Turns OS shutdown signals into [`ServiceSignal::Shutdown`] and hands out
/// a sender for the other command sources (IPC server).
pub struct ServiceSignalHandler {
    receiver: mpsc::Receiver<ServiceSignal>,
}

impl ServiceSignalHandler {
    /// Start listening for shutdown signals.
    ///
    /// Returns the handler and a sender for other command sources.
    pub async fn new() -> Result<(Self, mpsc::Sender<ServiceSignal>), std::io::Error> {
        let (tx, rx) = mpsc::channel(10);
        spawn_shutdown_listeners(&tx)?;
        Ok((Self { receiver: rx }, tx))
    }

    /// Wait for the next signal
    pub async fn recv(&mut self) -> Option<ServiceSignal> {
        self.receiver.recv().await
    }
}

#[cfg(unix)]
/// Forward SIGINT and SIGTERM as shutdown requests
fn spawn_shutdown_listeners(tx: &mpsc::Sender<ServiceSignal>) -> Result<(), std::io::Error> {
    use tokio::signal::unix::{signal, SignalKind};

    for (kind, name) in [
        (SignalKind::interrupt(), "SIGINT"),
        (SignalKind::terminate(), "SIGTERM"),
    ] {
        let mut stream = signal(kind)?;
        let tx = tx.clone();
        tokio::spawn(async move {
            stream.recv().await;
            info!(signal = name, "Shutdown requested");
            let _ = tx.send(ServiceSignal::Shutdown).await;
        });
    }
    Ok(())
}

/// Forward Ctrl+C as a shutdown request
#[cfg(not(unix))]
fn spawn_shutdown_listeners(tx: &mpsc::Sender<ServiceSignal>) -> Result<(), std::io::Error> {
    let tx = tx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!(signal = "ctrl-c", "Shutdown requested");
            let _ = tx.send(ServiceSignal::Shutdown).await;
        }
    });
    Ok(())
}
