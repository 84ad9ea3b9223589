//! Service command handler - sends commands to the running service via IPC

use super::args::ServiceAction;
use super::ipc::{create_ipc_client, IpcClient, RESPONSE_BUSY};
use super::presenter::Presenter;

/// Handle `trigger`, `status` and `panel`
pub async fn handle_service_command(
    action: ServiceAction,
    presenter: &Presenter,
) -> Result<(), String> {
    let client = create_ipc_client();
    send_action(client.as_ref(), action, presenter).await
}

async fn send_action(
    client: &dyn IpcClient,
    action: ServiceAction,
    presenter: &Presenter,
) -> Result<(), String> {
    if !client.is_service_running() {
        return Err("No Texta service running. Start it with: texta run".to_string());
    }

    let response = client
        .send_command(action.as_str())
        .await
        .map_err(|e| format!("Failed to communicate with the service: {}", e))?;
    let response = response.trim();

    if let Some(stripped) = response.strip_prefix("error:") {
        return Err(stripped.trim().to_string());
    }

    match action {
        ServiceAction::Status => presenter.output(response),
        ServiceAction::Trigger if response == RESPONSE_BUSY => {
            presenter.warn("A correction is already running");
        }
        ServiceAction::Trigger => presenter.info("Correction triggered"),
        ServiceAction::Panel => presenter.info("Panel toggled"),
    }
    Ok(())
}
