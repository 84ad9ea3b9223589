//! IPC (Inter-Process Communication) module for service control
//!
//! One request line per connection (`trigger`, `panel`, `status`), answered
//! with one line (`ok`, `busy`, `idle`, `running` or `error: ...`).
//!
//! Provides platform-specific implementations:
//! - Unix (Linux/macOS): Unix Domain Sockets
//! - Windows: Named Pipes

#[cfg(windows)]
mod named_pipe;
#[cfg(unix)]
mod unix_socket;

#[cfg(windows)]
pub use named_pipe::{NamedPipeClient, NamedPipeServer, PipePath};
#[cfg(unix)]
pub use unix_socket::{SocketPath, UnixSocketClient, UnixSocketServer};

use std::io;
use std::sync::Arc;

use tokio::sync::mpsc;

use super::signals::ServiceSignal;

pub const RESPONSE_OK: &str = "ok";
pub const RESPONSE_BUSY: &str = "busy";
pub const RESPONSE_IDLE: &str = "idle";
pub const RESPONSE_RUNNING: &str = "running";

/// Reports whether a workflow is currently in flight
pub type BusyFn = Arc<dyn Fn() -> bool + Send + Sync>;

/// Trait for IPC servers that listen for service commands
#[async_trait::async_trait]
pub trait IpcServer: Send + Sync {
    /// Bind to the IPC endpoint
    fn bind(&mut self) -> io::Result<()>;

    /// Get the path/name of the IPC endpoint
    fn path(&self) -> String;

    /// Accept connections until the endpoint fails.
    ///
    /// Commands go to `tx`; `busy` answers status and gates triggers.
    async fn run(&self, tx: mpsc::Sender<ServiceSignal>, busy: BusyFn) -> io::Result<()>;

    /// Cleanup IPC resources
    fn cleanup(&self);
}

/// Trait for IPC clients that send commands to the service
#[async_trait::async_trait]
pub trait IpcClient: Send + Sync {
    /// Check if the service appears to be running (endpoint exists)
    fn is_service_running(&self) -> bool;

    /// Send a command and receive the response line
    async fn send_command(&self, cmd: &str) -> io::Result<String>;
}

/// Answer one request line
pub async fn respond(
    request: &str,
    tx: &mpsc::Sender<ServiceSignal>,
    busy: bool,
) -> &'static str {
    match request.trim() {
        // Dropped rather than queued, same as a second hotkey press
        "trigger" if busy => RESPONSE_BUSY,
        "trigger" => forward(tx, ServiceSignal::Trigger).await,
        "panel" => forward(tx, ServiceSignal::TogglePanel).await,
        "status" if busy => RESPONSE_RUNNING,
        "status" => RESPONSE_IDLE,
        _ => "error: unknown command",
    }
}

async fn forward(tx: &mpsc::Sender<ServiceSignal>, signal: ServiceSignal) -> &'static str {
    match tx.send(signal).await {
        Ok(()) => RESPONSE_OK,
        Err(_) => "error: service is shutting down",
    }
}

/// Create the appropriate IPC server for the current platform
#[cfg(unix)]
pub fn create_ipc_server() -> Box<dyn IpcServer> {
    Box::new(UnixSocketServer::new(SocketPath::new()))
}

#[cfg(windows)]
pub fn create_ipc_server() -> Box<dyn IpcServer> {
    Box::new(NamedPipeServer::new(PipePath::new()))
}

/// Create the appropriate IPC client for the current platform
#[cfg(unix)]
pub fn create_ipc_client() -> Box<dyn IpcClient> {
    Box::new(UnixSocketClient::new(SocketPath::new()))
}

#[cfg(windows)]
pub fn create_ipc_client() -> Box<dyn IpcClient> {
    Box::new(NamedPipeClient::new(PipePath::new()))
}
