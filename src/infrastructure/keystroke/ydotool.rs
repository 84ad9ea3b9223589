//! Ydotool keystroke adapter for Wayland

use async_trait::async_trait;

use crate::application::ports::{KeyChord, Keystroke, KeystrokeError};

/// Linux input event codes
const KEY_LEFTCTRL: u16 = 29;
const KEY_C: u16 = 46;
const KEY_V: u16 = 47;

/// Sends shortcuts as raw key events through ydotool.
///
/// Requires the ydotoold daemon to be running and the user to be in the
/// input group.
#[derive(Debug, Default)]
pub struct YdotoolKeystroke;

impl YdotoolKeystroke {
    pub fn new() -> Self {
        Self
    }

    /// `code:1` presses, `code:0` releases
    fn events(chord: KeyChord) -> [String; 4] {
        let key = match chord {
            KeyChord::Copy => KEY_C,
            KeyChord::Paste => KEY_V,
        };
        [
            format!("{}:1", KEY_LEFTCTRL),
            format!("{}:1", key),
            format!("{}:0", key),
            format!("{}:0", KEY_LEFTCTRL),
        ]
    }
}

#[async_trait]
impl Keystroke for YdotoolKeystroke {
    async fn send(&self, chord: KeyChord) -> Result<(), KeystrokeError> {
        let events = Self::events(chord);
        let mut args = vec!["key"];
        args.extend(events.iter().map(String::as_str));
        super::run_tool("ydotool", &args, chord).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_events() {
        assert_eq!(YdotoolKeystroke::events(KeyChord::Copy), ["29:1", "46:1", "46:0", "29:0"]);
    }
}
