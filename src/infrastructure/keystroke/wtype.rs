//! Wtype keystroke adapter for Wayland

use async_trait::async_trait;

use crate::application::ports::{KeyChord, Keystroke, KeystrokeError};

/// Sends shortcuts through the wtype virtual keyboard
#[derive(Debug, Default)]
pub struct WtypeKeystroke;

impl WtypeKeystroke {
    /// Create a new wtype keystroke adapter
    pub fn new() -> Self {
        Self
    }

    /// Press Ctrl, tap the key, release Ctrl
    fn args(chord: KeyChord) -> [&'static str; 5] {
        let key = match chord {
            KeyChord::Copy => "c",
            KeyChord::Paste => "v",
        };
        ["-M", "ctrl", key, "-m", "ctrl"]
    }
}

#[async_trait]
impl Keystroke for WtypeKeystroke {
    async fn send(&self, chord: KeyChord) -> Result<(), KeystrokeError> {
        super::run_tool("wtype", &Self::args(chord), chord).await
    }
}
