//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::config::{AppConfig, LinuxConfig};
use crate::domain::error::ConfigError;
use crate::domain::{Duration, HotkeyBinding};
use crate::infrastructure::clipboard::CLIPBOARD_TOOLS;
use crate::infrastructure::KeystrokeToolPreference;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

const NOT_SET: &str = "(not set)";

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    ensure_known_key(key)?;
    validate_config_value(key, value)?;

    let mut config = store.load().await?;
    set_value(&mut config, key, value)?;
    store.save(&config).await?;

    let shown = if key == "api_key" {
        mask_api_key(value)
    } else {
        value.to_string()
    };
    presenter.success(&format!("{} = {}", key, shown));
    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    ensure_known_key(key)?;
    let config = store.load().await?;
    presenter.output(get_value(&config, key).as_deref().unwrap_or(NOT_SET));
    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;
    for key in VALID_CONFIG_KEYS {
        presenter.key_value(key, get_value(&config, key).as_deref().unwrap_or(NOT_SET));
    }
    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

fn ensure_known_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        return Ok(());
    }
    Err(ConfigError::ValidationError {
        key: key.to_string(),
        message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
    })
}

/// Store an already validated value under `key`
fn set_value(config: &mut AppConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    let text = Some(value.to_string());
    match key {
        "api_key" => config.api_key = text,
        "model" => config.model = text,
        "api_base_url" => config.api_base_url = text,
        "prompt" => config.prompt = text,
        "hotkey" => config.hotkey = text,
        "gui_hotkey" => config.gui_hotkey = text,
        "request_timeout" => config.request_timeout = text,
        "notify" => config.notify = Some(parse_bool(key, value)?),
        "linux.keystroke_tool" => {
            config.linux.get_or_insert_with(LinuxConfig::default).keystroke_tool = text
        }
        "linux.clipboard_tool" => {
            config.linux.get_or_insert_with(LinuxConfig::default).clipboard_tool = text
        }
        _ => return ensure_known_key(key),
    }
    Ok(())
}

/// Display form of the stored value, api keys masked
fn get_value(config: &AppConfig, key: &str) -> Option<String> {
    let linux = config.linux.as_ref();
    match key {
        "api_key" => config.api_key.as_deref().map(mask_api_key),
        "model" => config.model.clone(),
        "api_base_url" => config.api_base_url.clone(),
        "prompt" => config.prompt.clone(),
        "hotkey" => config.hotkey.clone(),
        "gui_hotkey" => config.gui_hotkey.clone(),
        "request_timeout" => config.request_timeout.clone(),
        "notify" => config.notify.map(|b| b.to_string()),
        "linux.keystroke_tool" => linux.and_then(|l| l.keystroke_tool.clone()),
        "linux.clipboard_tool" => linux.and_then(|l| l.clipboard_tool.clone()),
        _ => None,
    }
}

/// Validate a config value based on key type
fn validate_config_value(key: &str, value: &str) -> Result<(), ConfigError> {
    let invalid = |message: String| ConfigError::ValidationError {
        key: key.to_string(),
        message,
    };

    match key {
        "hotkey" | "gui_hotkey" => {
            value
                .parse::<HotkeyBinding>()
                .map_err(|e| invalid(e.to_string()))?;
        }
        "request_timeout" => {
            value
                .parse::<Duration>()
                .map_err(|e| invalid(e.to_string()))?;
        }
        "notify" => {
            parse_bool(key, value)?;
        }
        "api_base_url" => {
            if !(value.starts_with("http://") || value.starts_with("https://")) {
                return Err(invalid("URL must start with http:// or https://".to_string()));
            }
        }
        "model" | "api_key" => {
            if value.trim().is_empty() {
                return Err(invalid("Value must not be empty".to_string()));
            }
        }
        "linux.keystroke_tool" => {
            value
                .parse::<KeystrokeToolPreference>()
                .map_err(|e| invalid(e.to_string()))?;
        }
        "linux.clipboard_tool" => {
            if !CLIPBOARD_TOOLS.contains(&value) {
                return Err(invalid(format!(
                    "Invalid value '{}'. Valid options: {}",
                    value,
                    CLIPBOARD_TOOLS.join(", ")
                )));
            }
        }
        _ => {} // prompt accepts any text
    }
    Ok(())
}

/// Parse a boolean value
fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: "Value must be 'true' or 'false'".to_string(),
        }),
    }
}

/// Mask API key for display (show first 4 and last 4 chars)
fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        "*".repeat(chars.len())
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    }
}
