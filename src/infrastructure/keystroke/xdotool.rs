//! Xdotool keystroke adapter for X11

use async_trait::async_trait;

use crate::application::ports::{KeyChord, Keystroke, KeystrokeError};

/// Sends shortcuts with `xdotool key`
#[derive(Debug, Default)]
pub struct XdotoolKeystroke;

impl XdotoolKeystroke {
    /// Create a new xdotool keystroke adapter
    pub fn new() -> Self {
        Self
    }

    /// Key combination in xdotool syntax
    fn combo(chord: KeyChord) -> &'static str {
        match chord {
            KeyChord::Copy => "ctrl+c",
            KeyChord::Paste => "ctrl+v",
        }
    }
}

#[async_trait]
impl Keystroke for XdotoolKeystroke {
    async fn send(&self, chord: KeyChord) -> Result<(), KeystrokeError> {
        // --clearmodifiers so the still-held hotkey modifiers do not leak in
        super::run_tool(
            "xdotool",
            &["key", "--clearmodifiers", Self::combo(chord)],
            chord,
        )
        .await
    }
}
