//! Correction domain module

mod error_kind;
mod outcome;
mod prompt;
mod request;
mod retry;

pub use error_kind::{classify, ErrorKind};
pub use outcome::{CorrectionFailure, CorrectionOutcome};
pub use prompt::CorrectionPrompt;
pub use request::{preview, CorrectionRequest, PREVIEW_CHARS};
pub use retry::{RetryPolicy, DEFAULT_BASE_DELAY, DEFAULT_MAX_ATTEMPTS};
