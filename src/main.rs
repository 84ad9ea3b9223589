//! Texta CLI entry point

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use texta::cli::{
    app::{load_merged_config, run_correct, EXIT_ERROR},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    presenter::Presenter,
    run_service,
    service_cmd::handle_service_command,
};
use texta::infrastructure::XdgConfigStore;

/// Log filter used when RUST_LOG is unset
const DEFAULT_LOG_FILTER: &str = "texta=info";

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();
    let presenter = Presenter::new();

    // Commands that need no merged config
    match cli.command {
        Some(Commands::Config { action }) => {
            let store = XdgConfigStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            return ExitCode::SUCCESS;
        }
        Some(ref command) => {
            if let Some(action) = command.service_action() {
                if let Err(e) = handle_service_command(action, &presenter).await {
                    presenter.error(&e);
                    return ExitCode::from(EXIT_ERROR);
                }
                return ExitCode::SUCCESS;
            }
        }
        None => {}
    }

    let config = load_merged_config(cli.to_config()).await;

    match cli.command {
        Some(Commands::Correct { text }) => run_correct(config, text).await,
        _ => run_service(config).await,
    }
}
