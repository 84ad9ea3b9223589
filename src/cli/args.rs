//! CLI argument definitions using Clap

use clap::{Parser, Subcommand};

use crate::domain::config::{AppConfig, LinuxConfig};

/// Texta - select text, press a hotkey, get it proofread
#[derive(Parser, Debug)]
#[command(name = "texta")]
#[command(version)]
#[command(about = "Fix the selected text in any window with an LLM, triggered by a global hotkey")]
#[command(long_about = None)]
pub struct Cli {
    /// API key for the correction service
    #[arg(long, value_name = "KEY", global = true)]
    pub api_key: Option<String>,

    /// Model used for corrections
    #[arg(short = 'm', long, value_name = "MODEL", global = true)]
    pub model: Option<String>,

    /// Base URL of an OpenAI-compatible API
    #[arg(long, value_name = "URL", global = true)]
    pub api_base_url: Option<String>,

    /// Instruction sent along with the text
    #[arg(short = 'p', long, value_name = "TEXT", global = true)]
    pub prompt: Option<String>,

    /// Hotkey that runs a correction (e.g., ctrl+alt+c)
    #[arg(long, value_name = "HOTKEY")]
    pub hotkey: Option<String>,

    /// Hotkey that toggles the text panel
    #[arg(long, value_name = "HOTKEY")]
    pub gui_hotkey: Option<String>,

    /// Deadline for one correction request (e.g., 30s, 1m)
    #[arg(short = 't', long, value_name = "TIME", global = true)]
    pub request_timeout: Option<String>,

    /// Keystroke tool to use (enigo, none; Linux also: auto, ydotool, xdotool, wtype)
    #[arg(long, value_name = "TOOL")]
    pub keystroke_tool: Option<String>,

    /// Clipboard backend to use (arboard, wl-clipboard)
    #[arg(long, value_name = "TOOL")]
    pub clipboard_tool: Option<String>,

    /// Show desktop notifications
    #[arg(short = 'n', long)]
    pub notify: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Settings given on the command line; everything else stays unset
    pub fn to_config(&self) -> AppConfig {
        let linux = (self.keystroke_tool.is_some() || self.clipboard_tool.is_some()).then(|| {
            LinuxConfig {
                keystroke_tool: self.keystroke_tool.clone(),
                clipboard_tool: self.clipboard_tool.clone(),
            }
        });

        AppConfig {
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            api_base_url: self.api_base_url.clone(),
            prompt: self.prompt.clone(),
            hotkey: self.hotkey.clone(),
            gui_hotkey: self.gui_hotkey.clone(),
            request_timeout: self.request_timeout.clone(),
            notify: self.notify.then_some(true),
            linux,
        }
    }
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the hotkey service in the foreground (default)
    Run,
    /// Ask the running service to correct the current selection
    Trigger,
    /// Show whether the running service is busy
    Status,
    /// Show or hide the text panel of the running service
    Panel,
    /// Correct TEXT (or stdin) once and print the result
    Correct {
        /// Text to correct; read from stdin when omitted
        text: Option<String>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

impl Commands {
    /// The IPC request for commands that talk to a running service
    pub fn service_action(&self) -> Option<ServiceAction> {
        match self {
            Self::Trigger => Some(ServiceAction::Trigger),
            Self::Status => Some(ServiceAction::Status),
            Self::Panel => Some(ServiceAction::Panel),
            _ => None,
        }
    }
}

/// Requests understood by the running service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceAction {
    Trigger,
    Status,
    Panel,
}

impl ServiceAction {
    /// Wire form of the request
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Trigger => "trigger",
            Self::Status => "status",
            Self::Panel => "panel",
        }
    }
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "api_key",
    "model",
    "api_base_url",
    "prompt",
    "hotkey",
    "gui_hotkey",
    "request_timeout",
    "notify",
    "linux.keystroke_tool",
    "linux.clipboard_tool",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_defaults() {
        let cli = Cli::parse_from(["texta"]);
        assert!(cli.api_key.is_none());
        assert!(cli.model.is_none());
        assert!(cli.hotkey.is_none());
        assert!(cli.keystroke_tool.is_none());
        assert!(!cli.notify);
        assert!(cli.command.is_none());
    }

    #[test]
    fn cli_parses_service_options() {
        let cli = Cli::parse_from([
            "texta",
            "--hotkey",
            "ctrl+shift+f",
            "--gui-hotkey",
            "ctrl+shift+p",
            "-t",
            "45s",
            "-n",
            "run",
        ]);
        assert_eq!(cli.hotkey.as_deref(), Some("ctrl+shift+f"));
        assert_eq!(cli.gui_hotkey.as_deref(), Some("ctrl+shift+p"));
        assert_eq!(cli.request_timeout.as_deref(), Some("45s"));
        assert!(cli.notify);
        assert!(matches!(cli.command, Some(Commands::Run)));
    }

    #[test]
    fn cli_parses_correct_with_text() {
        let cli = Cli::parse_from(["texta", "correct", "este testo", "-m", "gpt-4o"]);
        assert_eq!(cli.model.as_deref(), Some("gpt-4o"));
        match cli.command {
            Some(Commands::Correct { text }) => assert_eq!(text.as_deref(), Some("este testo")),
            other => panic!("Expected Correct command, got {:?}", other),
        }
    }

    #[test]
    fn cli_parses_correct_without_text() {
        let cli = Cli::parse_from(["texta", "correct"]);
        assert!(matches!(cli.command, Some(Commands::Correct { text: None })));
    }

    #[test]
    fn cli_maps_service_actions() {
        for (arg, action) in [
            ("trigger", ServiceAction::Trigger),
            ("status", ServiceAction::Status),
            ("panel", ServiceAction::Panel),
        ] {
            let cli = Cli::parse_from(["texta", arg]);
            let command = cli.command.expect("subcommand");
            assert_eq!(command.service_action(), Some(action));
            assert_eq!(action.as_str(), arg);
        }
        assert_eq!(Commands::Run.service_action(), None);
    }

    #[test]
    fn cli_parses_config_init() {
        let cli = Cli::parse_from(["texta", "config", "init"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Config {
                action: ConfigAction::Init
            })
        ));
    }

    #[test]
    fn cli_parses_config_set() {
        let cli = Cli::parse_from(["texta", "config", "set", "hotkey", "ctrl+alt+x"]);
        if let Some(Commands::Config {
            action: ConfigAction::Set { key, value },
        }) = cli.command
        {
            assert_eq!(key, "hotkey");
            assert_eq!(value, "ctrl+alt+x");
        } else {
            panic!("Expected Config Set command");
        }
    }

    #[test]
    fn valid_config_keys() {
        assert!(is_valid_config_key("api_key"));
        assert!(is_valid_config_key("request_timeout"));
        assert!(is_valid_config_key("linux.clipboard_tool"));
        assert!(!is_valid_config_key("duration"));
        assert!(!is_valid_config_key("invalid_key"));
    }

    #[test]
    fn cli_parses_tools() {
        let cli = Cli::parse_from([
            "texta",
            "--keystroke-tool",
            "xdotool",
            "--clipboard-tool",
            "wl-clipboard",
        ]);
        assert_eq!(cli.keystroke_tool.as_deref(), Some("xdotool"));
        assert_eq!(cli.clipboard_tool.as_deref(), Some("wl-clipboard"));
    }

    #[test]
    fn to_config_only_sets_given_flags() {
        let config = Cli::parse_from(["texta"]).to_config();
        assert_eq!(config, AppConfig::empty());

        let config = Cli::parse_from(["texta", "--clipboard-tool", "wl-clipboard", "-n"]).to_config();
        assert_eq!(config.notify, Some(true));
        assert_eq!(config.clipboard_tool_or_default(), "wl-clipboard");
        assert_eq!(config.linux.as_ref().and_then(|l| l.keystroke_tool.as_deref()), None);
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }
}
