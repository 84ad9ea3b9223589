//! Workflow stage machine

use std::fmt;
use thiserror::Error;

/// Stage of one capture → correct → paste execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WorkflowStage {
    #[default]
    Idle,
    Animating,
    Capturing,
    Correcting,
    Pasting,
    Cleanup,
}

impl WorkflowStage {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Animating => "animating",
            Self::Capturing => "capturing",
            Self::Correcting => "correcting",
            Self::Pasting => "pasting",
            Self::Cleanup => "cleanup",
        }
    }

    /// Stages reachable from this one
    const fn allows(&self, next: WorkflowStage) -> bool {
        use WorkflowStage::*;
        matches!(
            (self, next),
            (Idle, Animating)
                | (Animating, Capturing)
                | (Capturing, Correcting)
                | (Correcting, Pasting)
                | (Cleanup, Idle)
        ) || (!matches!(self, Idle | Cleanup) && matches!(next, Cleanup))
    }
}

impl fmt::Display for WorkflowStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid workflow transition: cannot move from {from} to {to}")]
pub struct InvalidStageTransition {
    pub from: WorkflowStage,
    pub to: WorkflowStage,
}

/// Per-execution bookkeeping, created at the start of a workflow and dropped
/// at its end
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowState {
    pub error_occurred: bool,
    pub animation_started: bool,
    pub original_clipboard: String,
}

/// Stage machine for one workflow execution.
///
///   IDLE -> ANIMATING -> CAPTURING -> CORRECTING -> PASTING -> CLEANUP -> IDLE
///
/// Any active stage may jump straight to CLEANUP.
#[derive(Debug, Default)]
pub struct WorkflowSession {
    stage: WorkflowStage,
}

impl WorkflowSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> WorkflowStage {
        self.stage
    }

    pub fn is_idle(&self) -> bool {
        self.stage == WorkflowStage::Idle
    }

    pub fn advance(&mut self, next: WorkflowStage) -> Result<(), InvalidStageTransition> {
        if !self.stage.allows(next) {
            return Err(InvalidStageTransition {
                from: self.stage,
                to: next,
            });
        }
        self.stage = next;
        Ok(())
    }

    /// Enter cleanup from wherever the execution stopped. No-op if already
    /// cleaning up.
    pub fn begin_cleanup(&mut self) {
        if self.stage != WorkflowStage::Idle {
            self.stage = WorkflowStage::Cleanup;
        }
    }

    pub fn finish(&mut self) {
        self.stage = WorkflowStage::Idle;
    }
}
