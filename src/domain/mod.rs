//! Domain layer - Core business logic
//!
//! Contains value objects, entities, and domain errors.
//! This layer has no dependencies on external systems.

pub mod config;
pub mod correction;
pub mod error;
pub mod hotkey;
pub mod timing;
pub mod workflow;

// Re-export common types
pub use config::AppConfig;
pub use correction::{
    classify, CorrectionFailure, CorrectionOutcome, CorrectionPrompt, CorrectionRequest,
    ErrorKind, RetryPolicy,
};
pub use error::*;
pub use hotkey::HotkeyBinding;
pub use timing::Duration;
pub use workflow::{WorkflowSession, WorkflowStage, WorkflowState};
