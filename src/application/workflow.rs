//! Capture → correct → paste workflow
//!
//! At most one execution is in flight at a time. A trigger that arrives while
//! one is running is dropped. Whatever happens inside an execution, cleanup
//! closes the animation, restores the original clipboard, reports completion
//! and releases the execution lock.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::FutureExt;
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::domain::correction::{preview, CorrectionOutcome, CorrectionRequest, ErrorKind};
use crate::domain::workflow::{WorkflowSession, WorkflowStage, WorkflowState};

use super::correction::RetryingCorrectionService;
use super::events::WorkflowEvent;
use super::ports::{Clipboard, Corrector, Delay, SelectionError, TextSelection};

/// Status shown when a workflow completes without error
pub const SUCCESS_MESSAGE: &str = "Text corrected.";

/// Step-level failures, each mapped to one status line
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Capture failed: {0}")]
    Capture(SelectionError),

    #[error("No text selected")]
    NothingSelected,

    #[error("No API key configured")]
    MissingCredential,

    #[error("Correction failed: {0}")]
    Correction(ErrorKind),

    #[error("Paste failed: {0}")]
    Paste(SelectionError),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl WorkflowError {
    /// Status line shown to the user
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Capture(_) => "Failed to capture the selected text.",
            Self::NothingSelected => "No text was detected.",
            Self::MissingCredential => "Error: no API key configured.",
            Self::Correction(kind) => kind.user_message(),
            Self::Paste(_) => {
                "Failed to paste the text. The text was corrected but could not be pasted."
            }
            Self::Unexpected(_) => "Unexpected processing error.",
        }
    }
}

/// Pauses that give the presentation layer time to react
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkflowTimings {
    pub after_animation_start: Duration,
    pub after_animation_close: Duration,
    pub before_restore: Duration,
}

impl WorkflowTimings {
    /// No pauses at all
    pub const fn immediate() -> Self {
        Self {
            after_animation_start: Duration::ZERO,
            after_animation_close: Duration::ZERO,
            before_restore: Duration::ZERO,
        }
    }
}

impl Default for WorkflowTimings {
    fn default() -> Self {
        Self {
            after_animation_start: Duration::from_millis(100),
            after_animation_close: Duration::from_millis(100),
            before_restore: Duration::from_millis(150),
        }
    }
}

/// Holds the execution lock; dropping it releases the lock, so release also
/// happens while unwinding.
struct ExecutionGuard {
    flag: Arc<AtomicBool>,
}

impl ExecutionGuard {
    fn try_acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self {
                flag: Arc::clone(flag),
            })
    }
}

impl Drop for ExecutionGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

struct WorkflowInner<S, C, R, D>
where
    R: Corrector,
    D: Delay,
{
    selection: S,
    clipboard: C,
    service: RetryingCorrectionService<R, D>,
    events: UnboundedSender<WorkflowEvent>,
    timings: WorkflowTimings,
    session: Mutex<WorkflowSession>,
}

/// Single-flight orchestrator for the correction workflow
pub struct CorrectionWorkflow<S, C, R, D>
where
    R: Corrector,
    D: Delay,
{
    inner: Arc<WorkflowInner<S, C, R, D>>,
    running: Arc<AtomicBool>,
}

impl<S, C, R, D> Clone for CorrectionWorkflow<S, C, R, D>
where
    R: Corrector,
    D: Delay,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            running: Arc::clone(&self.running),
        }
    }
}

impl<S, C, R, D> CorrectionWorkflow<S, C, R, D>
where
    S: TextSelection + 'static,
    C: Clipboard + 'static,
    R: Corrector + 'static,
    D: Delay + 'static,
{
    pub fn new(
        selection: S,
        clipboard: C,
        service: RetryingCorrectionService<R, D>,
        events: UnboundedSender<WorkflowEvent>,
        timings: WorkflowTimings,
    ) -> Self {
        Self {
            inner: Arc::new(WorkflowInner {
                selection,
                clipboard,
                service,
                events,
                timings,
                session: Mutex::new(WorkflowSession::new()),
            }),
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether an execution currently holds the lock
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Stage of the in-flight execution, `Idle` if none
    pub fn stage(&self) -> WorkflowStage {
        self.inner.session().stage()
    }

    /// Start an execution in the background.
    ///
    /// Returns `false` without doing anything if one is already running.
    pub fn trigger(&self) -> bool {
        self.spawn().is_some()
    }

    /// Like [`trigger`](Self::trigger), returning a handle that resolves to
    /// the execution's success flag.
    pub fn spawn(&self) -> Option<JoinHandle<bool>> {
        let Some(guard) = ExecutionGuard::try_acquire(&self.running) else {
            warn!("Workflow already running, ignoring trigger");
            return None;
        };

        info!("Starting workflow");
        let inner = Arc::clone(&self.inner);
        Some(tokio::spawn(async move {
            let success = inner.execute().await;
            drop(guard);
            success
        }))
    }

    /// Run one execution and wait for it. `None` if one was already running.
    pub async fn run(&self) -> Option<bool> {
        let handle = self.spawn()?;
        match handle.await {
            Ok(success) => Some(success),
            Err(err) => {
                error!(error = %err, "Workflow task aborted");
                Some(false)
            }
        }
    }
}

impl<S, C, R, D> WorkflowInner<S, C, R, D>
where
    S: TextSelection,
    C: Clipboard,
    R: Corrector,
    D: Delay,
{
    fn session(&self) -> MutexGuard<'_, WorkflowSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn enter(&self, stage: WorkflowStage) {
        if let Err(err) = self.session().advance(stage) {
            warn!(error = %err, "Unexpected workflow stage change");
        }
    }

    fn emit(&self, event: WorkflowEvent) {
        if self.events.send(event).is_err() {
            debug!("No presentation listener for workflow event");
        }
    }

    async fn execute(&self) -> bool {
        let mut state = WorkflowState::default();

        let result = AssertUnwindSafe(self.run_steps(&mut state))
            .catch_unwind()
            .await;

        let failure = match result {
            Ok(Ok(())) => None,
            Ok(Err(err)) => Some(err),
            Err(payload) => Some(WorkflowError::Unexpected(panic_message(payload.as_ref()))),
        };

        if let Some(err) = failure {
            error!(error = %err, "Workflow step failed");
            state.error_occurred = true;
            self.emit(WorkflowEvent::status(err.user_message(), true));
        }

        self.cleanup(&state).await
    }

    async fn run_steps(&self, state: &mut WorkflowState) -> Result<(), WorkflowError> {
        self.enter(WorkflowStage::Animating);
        self.emit(WorkflowEvent::AnimationStart);
        state.animation_started = true;
        pause(self.timings.after_animation_start).await;

        self.enter(WorkflowStage::Capturing);
        info!("Capturing selected text");
        state.original_clipboard = self
            .clipboard
            .read()
            .await
            .map_err(|e| WorkflowError::Unexpected(e.to_string()))?;
        debug!(
            chars = state.original_clipboard.chars().count(),
            "Saved original clipboard"
        );

        let captured = self
            .selection
            .capture()
            .await
            .map_err(WorkflowError::Capture)?;
        let request = captured
            .and_then(CorrectionRequest::new)
            .ok_or(WorkflowError::NothingSelected)?;
        info!(text = %request.preview(), "Captured text");
        self.emit(WorkflowEvent::text_result(request.text(), ""));

        self.enter(WorkflowStage::Correcting);
        if !self.service.has_credential() {
            return Err(WorkflowError::MissingCredential);
        }
        let corrected = match self.service.correct(&request, None).await {
            CorrectionOutcome::Success { corrected_text } => corrected_text,
            CorrectionOutcome::Failure { kind, .. } => {
                return Err(WorkflowError::Correction(kind));
            }
        };
        info!(text = %preview(&corrected), "Correction complete");
        self.emit(WorkflowEvent::text_result(request.text(), corrected.as_str()));

        self.enter(WorkflowStage::Pasting);
        self.selection
            .paste(&corrected)
            .await
            .map_err(WorkflowError::Paste)?;
        info!("Pasted corrected text");
        self.emit(WorkflowEvent::status(SUCCESS_MESSAGE, false));

        Ok(())
    }

    async fn cleanup(&self, state: &WorkflowState) -> bool {
        self.session().begin_cleanup();

        if state.animation_started {
            self.emit(WorkflowEvent::AnimationClose);
            pause(self.timings.after_animation_close).await;
        }

        if !state.original_clipboard.is_empty() {
            pause(self.timings.before_restore).await;
            match self.clipboard.write(&state.original_clipboard).await {
                Ok(()) => debug!("Restored original clipboard"),
                Err(err) => error!(error = %err, "Failed to restore clipboard"),
            }
        }

        let success = !state.error_occurred;
        info!(success, "Workflow finished");
        self.emit(WorkflowEvent::WorkflowComplete { success });
        self.session().finish();
        success
    }
}

async fn pause(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "panic".to_string())
}
