//! Keystroke tool factory with automatic detection

use std::fmt;
use std::str::FromStr;

#[cfg(target_os = "linux")]
use std::env;
#[cfg(target_os = "linux")]
use std::path::Path;
#[cfg(target_os = "linux")]
use std::process::Stdio;

#[cfg(target_os = "linux")]
use tokio::process::Command;
use tracing::debug;

use crate::application::ports::{Keystroke, KeystrokeError};

use super::enigo::EnigoKeystroke;
use super::noop::NoOpKeystroke;
#[cfg(target_os = "linux")]
use super::wtype::WtypeKeystroke;
#[cfg(target_os = "linux")]
use super::xdotool::XdotoolKeystroke;
#[cfg(target_os = "linux")]
use super::ydotool::YdotoolKeystroke;

/// Keystroke backend actually in use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeystrokeTool {
    /// Cross-platform enigo library
    Enigo,
    /// Linux: ydotool (requires ydotoold daemon)
    Ydotool,
    /// Linux: wtype (Wayland native)
    Wtype,
    /// Linux: xdotool (X11)
    Xdotool,
    /// Shortcuts disabled
    None,
}

impl fmt::Display for KeystrokeTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Enigo => "enigo",
            Self::Ydotool => "ydotool",
            Self::Wtype => "wtype",
            Self::Xdotool => "xdotool",
            Self::None => "none",
        };
        f.write_str(name)
    }
}

/// User preference for keystroke tool selection.
///
/// - All platforms support `Enigo` (the default) and `None`.
/// - Linux additionally supports `Auto`, `Ydotool`, `Xdotool`, and `Wtype`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeystrokeToolPreference {
    /// Use cross-platform enigo library (default on all platforms)
    #[default]
    Enigo,
    /// Never send shortcuts
    None,
    /// Auto-detect best native tool (Linux only)
    #[cfg(target_os = "linux")]
    Auto,
    /// Use ydotool (Linux only, requires ydotoold daemon)
    #[cfg(target_os = "linux")]
    Ydotool,
    /// Use xdotool (Linux only, X11)
    #[cfg(target_os = "linux")]
    Xdotool,
    /// Use wtype (Linux only, Wayland native)
    #[cfg(target_os = "linux")]
    Wtype,
}

impl fmt::Display for KeystrokeToolPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enigo => write!(f, "enigo"),
            Self::None => write!(f, "none"),
            #[cfg(target_os = "linux")]
            Self::Auto => write!(f, "auto"),
            #[cfg(target_os = "linux")]
            Self::Ydotool => write!(f, "ydotool"),
            #[cfg(target_os = "linux")]
            Self::Xdotool => write!(f, "xdotool"),
            #[cfg(target_os = "linux")]
            Self::Wtype => write!(f, "wtype"),
        }
    }
}

/// Error type for parsing keystroke tool preference
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid keystroke tool '{value}'. Valid options: {valid_options}")]
pub struct ParseKeystrokeToolError {
    pub value: String,
    pub valid_options: &'static str,
}

impl FromStr for KeystrokeToolPreference {
    type Err = ParseKeystrokeToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "enigo" => Ok(Self::Enigo),
            "none" | "off" => Ok(Self::None),
            #[cfg(target_os = "linux")]
            "auto" => Ok(Self::Auto),
            #[cfg(target_os = "linux")]
            "ydotool" => Ok(Self::Ydotool),
            #[cfg(target_os = "linux")]
            "xdotool" => Ok(Self::Xdotool),
            #[cfg(target_os = "linux")]
            "wtype" => Ok(Self::Wtype),
            _ => Err(ParseKeystrokeToolError {
                value: s.to_string(),
                #[cfg(target_os = "linux")]
                valid_options: "enigo, auto, ydotool, xdotool, wtype, none",
                #[cfg(not(target_os = "linux"))]
                valid_options: "enigo, none",
            }),
        }
    }
}

/// Check if ydotool is usable (binary on PATH and ydotoold socket present)
#[cfg(target_os = "linux")]
async fn is_ydotool_available() -> bool {
    if !is_tool_available("ydotool").await {
        return false;
    }

    let socket_paths = [
        env::var("YDOTOOL_SOCKET").ok(),
        env::var("XDG_RUNTIME_DIR")
            .map(|dir| format!("{}/.ydotool_socket", dir))
            .ok(),
        Some("/tmp/.ydotool_socket".to_string()),
    ];

    socket_paths
        .into_iter()
        .flatten()
        .any(|path| Path::new(&path).exists())
}

/// Check if a tool binary is available using `which`
#[cfg(target_os = "linux")]
async fn is_tool_available(tool: &str) -> bool {
    Command::new("which")
        .arg(tool)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(target_os = "linux")]
fn is_wayland_session() -> bool {
    env::var_os("WAYLAND_DISPLAY").is_some()
        || env::var("XDG_SESSION_TYPE").is_ok_and(|t| t.eq_ignore_ascii_case("wayland"))
}

/// Detect the best available keystroke tool
///
/// On Windows/macOS: always Enigo.
/// On Linux Wayland: wtype → ydotool → Enigo.
/// On Linux X11: xdotool → Enigo.
pub async fn detect_keystroke_tool() -> KeystrokeTool {
    #[cfg(not(target_os = "linux"))]
    {
        KeystrokeTool::Enigo
    }

    #[cfg(target_os = "linux")]
    {
        if is_wayland_session() {
            if is_tool_available("wtype").await {
                return KeystrokeTool::Wtype;
            }
            if is_ydotool_available().await {
                return KeystrokeTool::Ydotool;
            }
        } else if is_tool_available("xdotool").await {
            return KeystrokeTool::Xdotool;
        }

        KeystrokeTool::Enigo
    }
}

/// Create a specific keystroke tool adapter
fn instantiate(tool: KeystrokeTool) -> Box<dyn Keystroke> {
    match tool {
        KeystrokeTool::Enigo => Box::new(EnigoKeystroke::new()),
        KeystrokeTool::None => Box::new(NoOpKeystroke::new()),
        #[cfg(target_os = "linux")]
        KeystrokeTool::Ydotool => Box::new(YdotoolKeystroke::new()),
        #[cfg(target_os = "linux")]
        KeystrokeTool::Wtype => Box::new(WtypeKeystroke::new()),
        #[cfg(target_os = "linux")]
        KeystrokeTool::Xdotool => Box::new(XdotoolKeystroke::new()),
        #[cfg(not(target_os = "linux"))]
        KeystrokeTool::Ydotool | KeystrokeTool::Wtype | KeystrokeTool::Xdotool => {
            Box::new(EnigoKeystroke::new())
        }
    }
}

/// Create a keystroke adapter using the specified preference.
///
/// Returns the adapter and the tool in use, or an error if an explicitly
/// requested tool is missing.
pub async fn create_keystroke(
    preference: KeystrokeToolPreference,
) -> Result<(Box<dyn Keystroke>, KeystrokeTool), KeystrokeError> {
    let tool = match preference {
        KeystrokeToolPreference::Enigo => KeystrokeTool::Enigo,
        KeystrokeToolPreference::None => KeystrokeTool::None,
        #[cfg(target_os = "linux")]
        KeystrokeToolPreference::Auto => detect_keystroke_tool().await,
        #[cfg(target_os = "linux")]
        KeystrokeToolPreference::Ydotool => {
            if !is_ydotool_available().await {
                return Err(KeystrokeError::ToolNotFound("ydotool"));
            }
            KeystrokeTool::Ydotool
        }
        #[cfg(target_os = "linux")]
        KeystrokeToolPreference::Xdotool => {
            if !is_tool_available("xdotool").await {
                return Err(KeystrokeError::ToolNotFound("xdotool"));
            }
            KeystrokeTool::Xdotool
        }
        #[cfg(target_os = "linux")]
        KeystrokeToolPreference::Wtype => {
            if !is_tool_available("wtype").await {
                return Err(KeystrokeError::ToolNotFound("wtype"));
            }
            KeystrokeTool::Wtype
        }
    };

    debug!(%tool, "Using keystroke tool");
    Ok((instantiate(tool), tool))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keystroke_tool_display() {
        assert_eq!(KeystrokeTool::Enigo.to_string(), "enigo");
        assert_eq!(KeystrokeTool::Ydotool.to_string(), "ydotool");
        assert_eq!(KeystrokeTool::Wtype.to_string(), "wtype");
        assert_eq!(KeystrokeTool::Xdotool.to_string(), "xdotool");
        assert_eq!(KeystrokeTool::None.to_string(), "none");
    }

    #[test]
    fn preference_round_trips_through_display() {
        for name in ["enigo", "none"] {
            let pref: KeystrokeToolPreference = name.parse().unwrap();
            assert_eq!(pref.to_string(), name);
        }
        #[cfg(target_os = "linux")]
        for name in ["auto", "ydotool", "xdotool", "wtype"] {
            let pref: KeystrokeToolPreference = name.parse().unwrap();
            assert_eq!(pref.to_string(), name);
        }
    }

    #[test]
    fn preference_parse_is_case_insensitive() {
        assert_eq!(
            "ENIGO".parse::<KeystrokeToolPreference>().unwrap(),
            KeystrokeToolPreference::Enigo
        );
        assert_eq!(
            "off".parse::<KeystrokeToolPreference>().unwrap(),
            KeystrokeToolPreference::None
        );
    }

    #[test]
    fn preference_parse_invalid() {
        let err = "invalid".parse::<KeystrokeToolPreference>().unwrap_err();
        assert_eq!(err.value, "invalid");
        assert!(err.to_string().contains("Valid options"));
    }

    #[test]
    fn preference_default_is_enigo() {
        assert_eq!(
            KeystrokeToolPreference::default(),
            KeystrokeToolPreference::Enigo
        );
    }

    #[tokio::test]
    async fn explicit_none_needs_no_detection() {
        let (_adapter, tool) = create_keystroke(KeystrokeToolPreference::None)
            .await
            .unwrap();
        assert_eq!(tool, KeystrokeTool::None);
    }
}
