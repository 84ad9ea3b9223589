//! Workflow execution state

mod session;

pub use session::{InvalidStageTransition, WorkflowSession, WorkflowStage, WorkflowState};
