//! Keystroke port interface

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

/// Keystroke errors
#[derive(Debug, Clone, Error)]
pub enum KeystrokeError {
    #[error("{0} not found. Please install it or choose another keystroke tool.")]
    ToolNotFound(&'static str),

    #[error("Failed to initialize keystroke backend: {0}")]
    InitFailed(String),

    #[error("Failed to send {chord}: {message}")]
    SendFailed { chord: KeyChord, message: String },
}

/// Editing shortcut sent to the focused window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyChord {
    /// Ctrl+C (Cmd+C on macOS)
    Copy,
    /// Ctrl+V (Cmd+V on macOS)
    Paste,
}

impl KeyChord {
    /// The letter pressed together with the platform modifier
    pub const fn letter(&self) -> char {
        match self {
            Self::Copy => 'c',
            Self::Paste => 'v',
        }
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Copy => f.write_str("copy shortcut"),
            Self::Paste => f.write_str("paste shortcut"),
        }
    }
}

/// Port for synthetic key presses
#[async_trait]
pub trait Keystroke: Send + Sync {
    /// Press and release `chord` in the currently focused window.
    async fn send(&self, chord: KeyChord) -> Result<(), KeystrokeError>;
}

/// Blanket implementation for boxed keystroke types
#[async_trait]
impl Keystroke for Box<dyn Keystroke> {
    async fn send(&self, chord: KeyChord) -> Result<(), KeystrokeError> {
        self.as_ref().send(chord).await
    }
}
