//! Application layer - Use cases and port interfaces
//!
//! Contains the core business operations and trait definitions
//! for external system interactions.

pub mod correction;
pub mod events;
pub mod ports;
pub mod workflow;

// Re-export use cases
pub use correction::RetryingCorrectionService;
pub use events::WorkflowEvent;
pub use workflow::{CorrectionWorkflow, WorkflowError, WorkflowTimings, SUCCESS_MESSAGE};
