//! Resident service runner: hotkeys and IPC drive the correction workflow

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::application::ports::{Clipboard, Corrector, Delay, TextSelection};
use crate::application::{CorrectionWorkflow, WorkflowTimings};
use crate::domain::config::AppConfig;
use crate::infrastructure::{
    create_clipboard, create_keystroke, create_notifier, ClipboardSelection, GlobalHotkeyListener,
    HotkeyAction, KeystrokeToolPreference, TokioDelay,
};

use super::app::{
    build_correction_service, validate_config, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE_ERROR,
};
use super::ipc::{create_ipc_server, BusyFn};
#[cfg(unix)]
use super::pid_file::{PidFile, PidFileError};
use super::presentation::PresentationAdapter;
use super::presenter::Presenter;
use super::signals::{ServiceSignal, ServiceSignalHandler};

/// How long shutdown waits for an in-flight workflow to restore the clipboard
const SHUTDOWN_GRACE: StdDuration = StdDuration::from_secs(10);

/// Run the service until SIGINT/SIGTERM
pub async fn run_service(config: AppConfig) -> ExitCode {
    let presenter = Presenter::new();

    if let Err(message) = validate_config(&config) {
        presenter.error(&message);
        return ExitCode::from(EXIT_USAGE_ERROR);
    }

    let service = match build_correction_service(&config) {
        Ok(service) => service,
        Err(message) => {
            presenter.error(&message);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    #[cfg(unix)]
    let pid_file = PidFile::new();
    #[cfg(unix)]
    if let Err(e) = pid_file.acquire() {
        match e {
            PidFileError::AlreadyRunning(pid) => {
                presenter.error(&format!("Another Texta service is already running (PID: {})", pid));
            }
            _ => presenter.error(&e.to_string()),
        }
        return ExitCode::from(EXIT_ERROR);
    }

    // Create adapters
    let preference: KeystrokeToolPreference =
        config.keystroke_tool_or_default().parse().unwrap_or_default();
    let (keystroke, tool) = match create_keystroke(preference).await {
        Ok(pair) => pair,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };
    let clipboard_tool = config.clipboard_tool_or_default();
    let selection = ClipboardSelection::new(create_clipboard(clipboard_tool), keystroke, TokioDelay);

    let notifier = config.notify_or_default().then(create_notifier);
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let (panel_tx, panel_rx) = mpsc::unbounded_channel();
    tokio::spawn(PresentationAdapter::new(Presenter::new(), notifier).run(events_rx, panel_rx));

    let workflow = CorrectionWorkflow::new(
        selection,
        create_clipboard(clipboard_tool),
        service,
        events_tx,
        WorkflowTimings::default(),
    );

    // Setup signal handler (returns handler + sender for the IPC server)
    let (mut signals, signal_tx) = match ServiceSignalHandler::new().await {
        Ok(s) => s,
        Err(e) => {
            presenter.error(&format!("Failed to setup signal handler: {}", e));
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let mut ipc_server = create_ipc_server();
    if let Err(e) = ipc_server.bind() {
        presenter.error(&format!("Failed to bind socket: {}", e));
        return ExitCode::from(EXIT_ERROR);
    }
    let ipc_path = ipc_server.path();
    let busy: BusyFn = {
        let workflow = workflow.clone();
        Arc::new(move || workflow.is_running())
    };
    tokio::spawn(async move {
        if let Err(e) = ipc_server.run(signal_tx, busy).await {
            error!(error = %e, "IPC server stopped");
        }
    });

    let trigger_key = config.hotkey_or_default();
    let panel_key = config.gui_hotkey_or_default();
    let mut listener = GlobalHotkeyListener::new();
    listener.register(trigger_key, HotkeyAction::Correct);
    listener.register(panel_key, HotkeyAction::TogglePanel);
    let mut hotkeys = match listener.start() {
        Ok(rx) => rx,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    presenter.service_status("Started, waiting for hotkeys...");
    presenter.info(&format!(
        "PID: {} | Correct: {} | Panel: {} | Keystroke: {} | Socket: {}",
        std::process::id(),
        trigger_key,
        panel_key,
        tool,
        ipc_path
    ));

    let clean = service_loop(&workflow, &mut signals, &mut hotkeys, &panel_tx, &presenter).await;

    if workflow.is_running() {
        presenter.service_status("Waiting for the running correction to finish...");
        let finished = tokio::time::timeout(SHUTDOWN_GRACE, async {
            while workflow.is_running() {
                tokio::time::sleep(StdDuration::from_millis(50)).await;
            }
        })
        .await;
        if finished.is_err() {
            warn!("Shutting down with a correction still in flight");
        }
    }

    listener.stop();
    #[cfg(unix)]
    let _ = pid_file.release();

    if clean {
        ExitCode::from(EXIT_SUCCESS)
    } else {
        ExitCode::from(EXIT_ERROR)
    }
}

async fn service_loop<S, C, R, D>(
    workflow: &CorrectionWorkflow<S, C, R, D>,
    signals: &mut ServiceSignalHandler,
    hotkeys: &mut mpsc::Receiver<HotkeyAction>,
    panel_tx: &mpsc::UnboundedSender<()>,
    presenter: &Presenter,
) -> bool
where
    S: TextSelection + 'static,
    C: Clipboard + 'static,
    R: Corrector + 'static,
    D: Delay + 'static,
{
    loop {
        let signal = tokio::select! {
            signal = signals.recv() => signal,
            Some(action) = hotkeys.recv() => Some(ServiceSignal::from(action)),
        };

        match signal {
            Some(ServiceSignal::Trigger) => {
                if !workflow.trigger() {
                    presenter.warn("A correction is already running, ignoring trigger");
                }
            }
            Some(ServiceSignal::TogglePanel) => {
                let _ = panel_tx.send(());
            }
            Some(ServiceSignal::Shutdown) => {
                info!("Service shutting down");
                presenter.service_status("Shutting down...");
                return true;
            }
            None => {
                // Every sender is gone
                return false;
            }
        }
    }
}

