//! Correction outcome types

use thiserror::Error;

use super::error_kind::{classify, ErrorKind};

/// A single failed correction attempt, already mapped into an [`ErrorKind`]
/// at the client boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct CorrectionFailure {
    pub kind: ErrorKind,
    pub message: String,
}

impl CorrectionFailure {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Build a failure by classifying the message text
    pub fn classified(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            kind: classify(&message),
            message,
        }
    }

    /// The attempt hit its own deadline
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }

    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

/// Definitive result of one correction invocation, retries included
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorrectionOutcome {
    Success { corrected_text: String },
    Failure { kind: ErrorKind, retryable: bool },
}

impl CorrectionOutcome {
    pub fn failure(kind: ErrorKind) -> Self {
        Self::Failure {
            kind,
            retryable: kind.is_retryable(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Corrected text on success
    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Success { corrected_text } => Some(corrected_text),
            Self::Failure { .. } => None,
        }
    }
}
