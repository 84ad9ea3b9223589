//! Cross-platform keystroke adapter using enigo
//!
//! Works on Windows, macOS, and Linux (X11).

use async_trait::async_trait;
use enigo::{Direction, Enigo, Key, Keyboard, Settings};

use crate::application::ports::{KeyChord, Keystroke, KeystrokeError};

/// Modifier used for editing shortcuts on this platform
#[cfg(target_os = "macos")]
const SHORTCUT_MODIFIER: Key = Key::Meta;
#[cfg(not(target_os = "macos"))]
const SHORTCUT_MODIFIER: Key = Key::Control;

/// Cross-platform keystroke adapter using enigo
#[derive(Debug, Default)]
pub struct EnigoKeystroke;

impl EnigoKeystroke {
    pub fn new() -> Self {
        Self
    }
}

fn press_chord(chord: KeyChord) -> Result<(), KeystrokeError> {
    let failed = |e: enigo::InputError| KeystrokeError::SendFailed {
        chord,
        message: e.to_string(),
    };

    let mut enigo = Enigo::new(&Settings::default())
        .map_err(|e| KeystrokeError::InitFailed(e.to_string()))?;

    enigo.key(SHORTCUT_MODIFIER, Direction::Press).map_err(failed)?;
    let clicked = enigo.key(Key::Unicode(chord.letter()), Direction::Click);
    // Release the modifier even when the click failed
    let released = enigo.key(SHORTCUT_MODIFIER, Direction::Release);

    clicked.map_err(failed)?;
    released.map_err(failed)
}

#[async_trait]
impl Keystroke for EnigoKeystroke {
    async fn send(&self, chord: KeyChord) -> Result<(), KeystrokeError> {
        // enigo operations are blocking, so run in spawn_blocking
        tokio::task::spawn_blocking(move || press_chord(chord))
            .await
            .map_err(|e| KeystrokeError::SendFailed {
                chord,
                message: format!("Task join error: {}", e),
            })?
    }
}
