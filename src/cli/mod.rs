//! CLI layer - Command-line interface
//!
//! Contains argument parsing, output formatting, signal handling,
//! IPC with the resident service and the application runners.

pub mod app;
pub mod args;
pub mod config_cmd;
pub mod ipc;
#[cfg(unix)]
pub mod pid_file;
pub mod presentation;
pub mod presenter;
pub mod service_app;
pub mod service_cmd;
pub mod signals;

// Re-export commonly used types
pub use app::{run_correct, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE_ERROR};
pub use args::{Cli, Commands, ConfigAction, ServiceAction};
pub use presentation::{PresentationAdapter, TextPanel};
pub use presenter::Presenter;
pub use service_app::run_service;
pub use service_cmd::handle_service_command;
