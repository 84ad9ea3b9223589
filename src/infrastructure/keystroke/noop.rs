//! No-op keystroke adapter

use async_trait::async_trait;
use tracing::debug;

use crate::application::ports::{KeyChord, Keystroke, KeystrokeError};

/// Keystroke adapter that sends nothing.
///
/// Capture then only sees what the user copied by hand.
#[derive(Debug, Default)]
pub struct NoOpKeystroke;

impl NoOpKeystroke {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Keystroke for NoOpKeystroke {
    async fn send(&self, chord: KeyChord) -> Result<(), KeystrokeError> {
        debug!(%chord, "Keystrokes disabled, not sending");
        Ok(())
    }
}
