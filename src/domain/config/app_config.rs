//! Application configuration value object

use serde::{Deserialize, Serialize};

use crate::domain::correction::CorrectionPrompt;
use crate::domain::hotkey::{HotkeyBinding, DEFAULT_GUI_HOTKEY, DEFAULT_HOTKEY};
use crate::domain::timing::Duration;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_API_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_KEYSTROKE_TOOL: &str = "enigo";
pub const DEFAULT_CLIPBOARD_TOOL: &str = "arboard";

/// Linux-specific configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinuxConfig {
    pub keystroke_tool: Option<String>,
    pub clipboard_tool: Option<String>,
}

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub api_base_url: Option<String>,
    pub prompt: Option<String>,
    pub hotkey: Option<String>,
    pub gui_hotkey: Option<String>,
    pub request_timeout: Option<String>,
    pub notify: Option<bool>,
    pub linux: Option<LinuxConfig>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            api_key: None,
            model: Some(DEFAULT_MODEL.to_string()),
            api_base_url: Some(DEFAULT_API_BASE_URL.to_string()),
            prompt: None,
            hotkey: Some(DEFAULT_HOTKEY.to_string()),
            gui_hotkey: Some(DEFAULT_GUI_HOTKEY.to_string()),
            request_timeout: Some(Duration::default_request_timeout().to_string()),
            notify: Some(false),
            linux: Some(LinuxConfig {
                keystroke_tool: Some(DEFAULT_KEYSTROKE_TOOL.to_string()),
                clipboard_tool: Some(DEFAULT_CLIPBOARD_TOOL.to_string()),
            }),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            api_key: other.api_key.or(self.api_key),
            model: other.model.or(self.model),
            api_base_url: other.api_base_url.or(self.api_base_url),
            prompt: other.prompt.or(self.prompt),
            hotkey: other.hotkey.or(self.hotkey),
            gui_hotkey: other.gui_hotkey.or(self.gui_hotkey),
            request_timeout: other.request_timeout.or(self.request_timeout),
            notify: other.notify.or(self.notify),
            linux: match (self.linux, other.linux) {
                (Some(b), Some(o)) => Some(LinuxConfig {
                    keystroke_tool: o.keystroke_tool.or(b.keystroke_tool),
                    clipboard_tool: o.clipboard_tool.or(b.clipboard_tool),
                }),
                (b, o) => o.or(b),
            },
        }
    }

    /// API key, ignoring blank values
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    pub fn model_or_default(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn api_base_url_or_default(&self) -> &str {
        self.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL)
    }

    /// Configured prompt, or the built-in proofreading instruction
    pub fn prompt_or_default(&self) -> CorrectionPrompt {
        CorrectionPrompt::from(self.prompt.clone())
    }

    /// Main hotkey, or the default if not set/invalid
    pub fn hotkey_or_default(&self) -> HotkeyBinding {
        self.hotkey
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(HotkeyBinding::default_trigger)
    }

    /// Panel hotkey, or the default if not set/invalid
    pub fn gui_hotkey_or_default(&self) -> HotkeyBinding {
        self.gui_hotkey
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(HotkeyBinding::default_panel)
    }

    /// Per-attempt deadline, or the default if not set/invalid
    pub fn request_timeout_or_default(&self) -> Duration {
        self.request_timeout
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    pub fn notify_or_default(&self) -> bool {
        self.notify.unwrap_or(false)
    }

    /// Keystroke tool preference, or "enigo" if not set
    pub fn keystroke_tool_or_default(&self) -> &str {
        self.linux
            .as_ref()
            .and_then(|l| l.keystroke_tool.as_deref())
            .unwrap_or(DEFAULT_KEYSTROKE_TOOL)
    }

    /// Clipboard tool preference, or "arboard" if not set
    pub fn clipboard_tool_or_default(&self) -> &str {
        self.linux
            .as_ref()
            .and_then(|l| l.clipboard_tool.as_deref())
            .unwrap_or(DEFAULT_CLIPBOARD_TOOL)
    }
}
