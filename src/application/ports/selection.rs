//! Selected-text capture and paste port

use async_trait::async_trait;
use thiserror::Error;

use super::clipboard::ClipboardError;
use super::keystroke::KeystrokeError;

#[derive(Debug, Clone, Error)]
pub enum SelectionError {
    #[error("Clipboard error: {0}")]
    Clipboard(#[from] ClipboardError),

    #[error("Keystroke error: {0}")]
    Keystroke(#[from] KeystrokeError),
}

/// Capture/paste capability the workflow drives
#[async_trait]
pub trait TextSelection: Send + Sync {
    /// Copy the current selection and return it.
    ///
    /// `Ok(None)` means nothing was selected.
    async fn capture(&self) -> Result<Option<String>, SelectionError>;

    /// Replace the current selection with `text`.
    async fn paste(&self, text: &str) -> Result<(), SelectionError>;
}

#[async_trait]
impl TextSelection for Box<dyn TextSelection> {
    async fn capture(&self) -> Result<Option<String>, SelectionError> {
        self.as_ref().capture().await
    }

    async fn paste(&self, text: &str) -> Result<(), SelectionError> {
        self.as_ref().paste(text).await
    }
}
