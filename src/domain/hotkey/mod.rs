//! Hotkey binding value object
//!
//! Bindings are written as `+`-separated tokens, e.g. `ctrl+alt+c`.

use std::fmt;
use std::str::FromStr;

use crate::domain::error::HotkeyParseError;

/// Main correction trigger
pub const DEFAULT_HOTKEY: &str = "ctrl+alt+c";

/// Panel toggle trigger
pub const DEFAULT_GUI_HOTKEY: &str = "ctrl+alt+g";

/// Modifier keys held together with the main key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub super_key: bool,
}

impl Modifiers {
    fn set(&mut self, token: &str) -> bool {
        match token {
            "ctrl" | "control" => self.ctrl = true,
            "alt" | "option" => self.alt = true,
            "shift" => self.shift = true,
            "super" | "win" | "cmd" | "command" | "meta" => self.super_key = true,
            _ => return false,
        }
        true
    }
}

/// The non-modifier key of a binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// `a`..`z`, stored lowercase
    Letter(char),
    /// `0`..`9`
    Digit(char),
    /// F1..F12
    Function(u8),
    Space,
    Enter,
    Tab,
    Escape,
    Backspace,
    Insert,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
    Up,
    Down,
    Left,
    Right,
}

impl Key {
    fn parse(token: &str) -> Option<Self> {
        let mut chars = token.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return match c {
                'a'..='z' => Some(Self::Letter(c)),
                '0'..='9' => Some(Self::Digit(c)),
                _ => None,
            };
        }

        if let Some(n) = token.strip_prefix('f') {
            if let Ok(n) = n.parse::<u8>() {
                return (1..=12).contains(&n).then_some(Self::Function(n));
            }
        }

        let key = match token {
            "space" => Self::Space,
            "enter" | "return" => Self::Enter,
            "tab" => Self::Tab,
            "esc" | "escape" => Self::Escape,
            "backspace" => Self::Backspace,
            "insert" | "ins" => Self::Insert,
            "delete" | "del" => Self::Delete,
            "home" => Self::Home,
            "end" => Self::End,
            "pageup" | "pgup" => Self::PageUp,
            "pagedown" | "pgdn" => Self::PageDown,
            "up" => Self::Up,
            "down" => Self::Down,
            "left" => Self::Left,
            "right" => Self::Right,
            _ => return None,
        };
        Some(key)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Letter(c) | Self::Digit(c) => write!(f, "{}", c),
            Self::Function(n) => write!(f, "f{}", n),
            Self::Space => f.write_str("space"),
            Self::Enter => f.write_str("enter"),
            Self::Tab => f.write_str("tab"),
            Self::Escape => f.write_str("escape"),
            Self::Backspace => f.write_str("backspace"),
            Self::Insert => f.write_str("insert"),
            Self::Delete => f.write_str("delete"),
            Self::Home => f.write_str("home"),
            Self::End => f.write_str("end"),
            Self::PageUp => f.write_str("pageup"),
            Self::PageDown => f.write_str("pagedown"),
            Self::Up => f.write_str("up"),
            Self::Down => f.write_str("down"),
            Self::Left => f.write_str("left"),
            Self::Right => f.write_str("right"),
        }
    }
}

/// A parsed global hotkey such as `ctrl+alt+c`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HotkeyBinding {
    pub modifiers: Modifiers,
    pub key: Key,
}

impl HotkeyBinding {
    pub fn default_trigger() -> Self {
        Self {
            modifiers: Modifiers {
                ctrl: true,
                alt: true,
                ..Default::default()
            },
            key: Key::Letter('c'),
        }
    }

    pub fn default_panel() -> Self {
        Self {
            key: Key::Letter('g'),
            ..Self::default_trigger()
        }
    }
}

impl FromStr for HotkeyBinding {
    type Err = HotkeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(HotkeyParseError::Empty);
        }

        let mut modifiers = Modifiers::default();
        let mut key = None;

        for token in normalized.split('+').map(str::trim) {
            if modifiers.set(token) {
                continue;
            }
            let parsed = Key::parse(token).ok_or_else(|| HotkeyParseError::UnknownKey {
                input: s.to_string(),
                key: token.to_string(),
            })?;
            if key.replace(parsed).is_some() {
                return Err(HotkeyParseError::MultipleKeys(s.to_string()));
            }
        }

        let key = key.ok_or_else(|| HotkeyParseError::MissingKey(s.to_string()))?;
        Ok(Self { modifiers, key })
    }
}

impl fmt::Display for HotkeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = &self.modifiers;
        for (held, name) in [
            (m.ctrl, "ctrl"),
            (m.alt, "alt"),
            (m.shift, "shift"),
            (m.super_key, "super"),
        ] {
            if held {
                write!(f, "{}+", name)?;
            }
        }
        write!(f, "{}", self.key)
    }
}
