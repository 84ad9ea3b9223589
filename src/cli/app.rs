//! Configuration loading and the one-shot `correct` runner

use std::env;
use std::io::IsTerminal;
use std::process::ExitCode;

use tokio::io::AsyncReadExt;
use tracing::warn;

use crate::application::ports::ConfigStore;
use crate::application::RetryingCorrectionService;
use crate::domain::config::AppConfig;
use crate::domain::correction::{CorrectionOutcome, CorrectionRequest};
use crate::domain::{Duration, HotkeyBinding};
use crate::infrastructure::{KeystrokeToolPreference, OpenAiCorrector, TokioDelay, XdgConfigStore};

use super::presenter::Presenter;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_PROMPT: &str = "CORRECTION_PROMPT";
pub const ENV_HOTKEY: &str = "HOTKEY";
pub const ENV_GUI_HOTKEY: &str = "GUI_HOTKEY";
pub const ENV_MODEL: &str = "TEXTA_MODEL";

/// Correction service wired to the OpenAI adapter
pub type OpenAiCorrectionService = RetryingCorrectionService<OpenAiCorrector, TokioDelay>;

/// Correct the given text (or stdin) once and print the result
pub async fn run_correct(config: AppConfig, text: Option<String>) -> ExitCode {
    let mut presenter = Presenter::new();

    if let Err(message) = validate_config(&config) {
        presenter.error(&message);
        return ExitCode::from(EXIT_USAGE_ERROR);
    }

    let text = match text {
        Some(text) => text,
        None => match read_stdin().await {
            Ok(text) => text,
            Err(message) => {
                presenter.error(&message);
                return ExitCode::from(EXIT_USAGE_ERROR);
            }
        },
    };

    let Some(request) = CorrectionRequest::new(text.trim_end_matches(['\n', '\r'])) else {
        presenter.error("No text to correct");
        return ExitCode::from(EXIT_USAGE_ERROR);
    };

    let service = match build_correction_service(&config) {
        Ok(service) => service,
        Err(message) => {
            presenter.error(&message);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    presenter.start_spinner("Correcting...");
    match service.correct(&request, None).await {
        CorrectionOutcome::Success { corrected_text } => {
            presenter.spinner_success("Correction complete");
            presenter.output(&corrected_text);
            ExitCode::from(EXIT_SUCCESS)
        }
        CorrectionOutcome::Failure { kind, .. } => {
            presenter.spinner_fail(kind.user_message());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

async fn read_stdin() -> Result<String, String> {
    if std::io::stdin().is_terminal() {
        return Err("No text given. Pass TEXT or pipe it on stdin".to_string());
    }
    let mut text = String::new();
    tokio::io::stdin()
        .read_to_string(&mut text)
        .await
        .map_err(|e| format!("Failed to read stdin: {}", e))?;
    Ok(text)
}

/// Build the retrying service from merged config.
///
/// Fails when no API key is configured or the HTTP client cannot be built.
pub fn build_correction_service(config: &AppConfig) -> Result<OpenAiCorrectionService, String> {
    let api_key = config.api_key().ok_or_else(missing_api_key_message)?;
    let timeout = config.request_timeout_or_default().as_std();

    let corrector = OpenAiCorrector::new(config.prompt_or_default())
        .with_base_url(config.api_base_url_or_default())
        .with_model(config.model_or_default())
        .with_timeout(timeout)
        .map_err(|e| format!("Failed to create HTTP client: {}", e))?;

    Ok(
        RetryingCorrectionService::new(corrector, TokioDelay, Some(api_key.to_string()))
            .with_attempt_timeout(timeout),
    )
}

pub fn missing_api_key_message() -> String {
    format!(
        "Missing API key. Set {} environment variable or run 'texta config set api_key <key>'",
        ENV_API_KEY
    )
}

/// Reject values that would otherwise fall back to defaults silently
pub fn validate_config(config: &AppConfig) -> Result<(), String> {
    for (name, value) in [("hotkey", &config.hotkey), ("gui_hotkey", &config.gui_hotkey)] {
        if let Some(raw) = value {
            raw.parse::<HotkeyBinding>()
                .map_err(|e| format!("Invalid {}: {}", name, e))?;
        }
    }
    if let Some(raw) = &config.request_timeout {
        raw.parse::<Duration>()
            .map_err(|e| format!("Invalid request_timeout: {}", e))?;
    }
    config
        .keystroke_tool_or_default()
        .parse::<KeystrokeToolPreference>()
        .map_err(|e| format!("Invalid keystroke_tool: {}", e))?;
    Ok(())
}

/// Settings taken from the environment
pub fn env_config() -> AppConfig {
    config_from_lookup(|name| env::var(name).ok())
}

fn config_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppConfig {
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
    AppConfig {
        api_key: get(ENV_API_KEY),
        model: get(ENV_MODEL),
        prompt: get(ENV_PROMPT),
        hotkey: get(ENV_HOTKEY),
        gui_hotkey: get(ENV_GUI_HOTKEY),
        ..Default::default()
    }
}

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = store.load().await.unwrap_or_else(|e| {
        warn!(error = %e, path = %store.path().display(), "Ignoring unreadable config file");
        AppConfig::empty()
    });

    merge_layers(file_config, env_config(), cli_config)
}

/// defaults < file < env < cli
fn merge_layers(file: AppConfig, env: AppConfig, cli: AppConfig) -> AppConfig {
    AppConfig::defaults().merge(file).merge(env).merge(cli)
}
