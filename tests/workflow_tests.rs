//! End-to-end workflow tests over a simulated desktop
//!
//! The fake clipboard and keyboard behave like a focused text field: a copy
//! puts the selection on the clipboard, a paste inserts the clipboard.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, Notify};

use texta::application::ports::{
    Clipboard, ClipboardError, Corrector, Delay, KeyChord, Keystroke, KeystrokeError,
};
use texta::application::{
    CorrectionWorkflow, RetryingCorrectionService, WorkflowEvent, WorkflowTimings, SUCCESS_MESSAGE,
};
use texta::domain::correction::{CorrectionFailure, CorrectionRequest, ErrorKind};
use texta::infrastructure::ClipboardSelection;

const SELECTED: &str = "este testo contem erro";
const CORRECTED: &str = "este texto contém erro corrigido";
const ORIGINAL_CLIPBOARD: &str = "link copiado antes\n(com quebra de linha)";

#[derive(Default)]
struct Desktop {
    clipboard: String,
    selection: String,
    pasted: Vec<String>,
    clipboard_writes: Vec<String>,
}

type SharedDesktop = Arc<Mutex<Desktop>>;

#[derive(Clone)]
struct FakeClipboard(SharedDesktop);

#[async_trait]
impl Clipboard for FakeClipboard {
    async fn read(&self) -> Result<String, ClipboardError> {
        Ok(self.0.lock().unwrap().clipboard.clone())
    }

    async fn write(&self, text: &str) -> Result<(), ClipboardError> {
        let mut desktop = self.0.lock().unwrap();
        desktop.clipboard = text.to_string();
        desktop.clipboard_writes.push(text.to_string());
        Ok(())
    }
}

struct FakeKeyboard {
    desktop: SharedDesktop,
    paste_fails: bool,
}

#[async_trait]
impl Keystroke for FakeKeyboard {
    async fn send(&self, chord: KeyChord) -> Result<(), KeystrokeError> {
        let mut desktop = self.desktop.lock().unwrap();
        match chord {
            KeyChord::Copy => desktop.clipboard = desktop.selection.clone(),
            KeyChord::Paste if self.paste_fails => {
                return Err(KeystrokeError::SendFailed {
                    chord,
                    message: "no focused window".into(),
                })
            }
            KeyChord::Paste => {
                let text = desktop.clipboard.clone();
                desktop.pasted.push(text);
            }
        }
        Ok(())
    }
}

/// Corrector replaying scripted results, then succeeding
#[derive(Clone, Default)]
struct ScriptedCorrector {
    script: Arc<Mutex<VecDeque<Result<String, CorrectionFailure>>>>,
    seen: Arc<Mutex<Vec<String>>>,
    gate: Option<Arc<Notify>>,
}

impl ScriptedCorrector {
    fn with_script(script: Vec<Result<String, CorrectionFailure>>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into())),
            ..Self::default()
        }
    }

    fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

#[async_trait]
impl Corrector for ScriptedCorrector {
    async fn attempt(
        &self,
        request: &CorrectionRequest,
        _credential: &str,
    ) -> Result<String, CorrectionFailure> {
        self.seen.lock().unwrap().push(request.text().to_string());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(CORRECTED.to_string()))
    }
}

#[derive(Clone, Default)]
struct RecordingDelay(Arc<Mutex<Vec<Duration>>>);

#[async_trait]
impl Delay for RecordingDelay {
    async fn wait(&self, duration: Duration) {
        self.0.lock().unwrap().push(duration);
    }
}

#[derive(Clone, Copy)]
struct NoDelay;

#[async_trait]
impl Delay for NoDelay {
    async fn wait(&self, _duration: Duration) {}
}

type Workflow = CorrectionWorkflow<
    ClipboardSelection<FakeClipboard, FakeKeyboard, NoDelay>,
    FakeClipboard,
    ScriptedCorrector,
    RecordingDelay,
>;

struct Harness {
    desktop: SharedDesktop,
    corrector: ScriptedCorrector,
    backoff: RecordingDelay,
    events: mpsc::UnboundedReceiver<WorkflowEvent>,
    workflow: Workflow,
}

impl Harness {
    fn new(selection: &str, corrector: ScriptedCorrector) -> Self {
        Self::build(selection, corrector, Some("sk-test"), false)
    }

    fn build(
        selection: &str,
        corrector: ScriptedCorrector,
        credential: Option<&str>,
        paste_fails: bool,
    ) -> Self {
        let desktop = Arc::new(Mutex::new(Desktop {
            clipboard: ORIGINAL_CLIPBOARD.to_string(),
            selection: selection.to_string(),
            ..Desktop::default()
        }));
        let keyboard = FakeKeyboard {
            desktop: Arc::clone(&desktop),
            paste_fails,
        };
        let selection = ClipboardSelection::new(FakeClipboard(Arc::clone(&desktop)), keyboard, NoDelay);
        let backoff = RecordingDelay::default();
        let service = RetryingCorrectionService::new(
            corrector.clone(),
            backoff.clone(),
            credential.map(str::to_string),
        );
        let (tx, events) = mpsc::unbounded_channel();
        let workflow = CorrectionWorkflow::new(
            selection,
            FakeClipboard(Arc::clone(&desktop)),
            service,
            tx,
            WorkflowTimings::immediate(),
        );

        Self {
            desktop,
            corrector,
            backoff,
            events,
            workflow,
        }
    }

    fn drain(&mut self) -> Vec<WorkflowEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }

    fn clipboard(&self) -> String {
        self.desktop.lock().unwrap().clipboard.clone()
    }

    fn pasted(&self) -> Vec<String> {
        self.desktop.lock().unwrap().pasted.clone()
    }

    fn restores(&self) -> usize {
        self.desktop
            .lock()
            .unwrap()
            .clipboard_writes
            .iter()
            .filter(|w| w.as_str() == ORIGINAL_CLIPBOARD)
            .count()
    }
}

fn status_of(events: &[WorkflowEvent]) -> Vec<(String, bool)> {
    events
        .iter()
        .filter_map(|e| match e {
            WorkflowEvent::Status { message, is_error } => Some((message.clone(), *is_error)),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn corrects_selection_and_restores_clipboard() {
    let mut h = Harness::new(SELECTED, ScriptedCorrector::default());

    assert_eq!(h.workflow.run().await, Some(true));

    assert_eq!(h.pasted(), vec![CORRECTED.to_string()]);
    assert_eq!(h.clipboard(), ORIGINAL_CLIPBOARD);
    assert_eq!(h.restores(), 1);
    assert_eq!(h.corrector.calls(), 1);
    assert!(h.backoff.0.lock().unwrap().is_empty());
    assert_eq!(
        h.drain(),
        vec![
            WorkflowEvent::AnimationStart,
            WorkflowEvent::text_result(SELECTED, ""),
            WorkflowEvent::text_result(SELECTED, CORRECTED),
            WorkflowEvent::status(SUCCESS_MESSAGE, false),
            WorkflowEvent::AnimationClose,
            WorkflowEvent::WorkflowComplete { success: true },
        ]
    );
}

#[tokio::test]
async fn transient_failure_is_retried_inside_workflow() {
    let corrector = ScriptedCorrector::with_script(vec![Err(CorrectionFailure::classified(
        "connection reset by peer",
    ))]);
    let mut h = Harness::new(SELECTED, corrector);

    assert_eq!(h.workflow.run().await, Some(true));

    assert_eq!(h.corrector.calls(), 2);
    assert_eq!(*h.backoff.0.lock().unwrap(), vec![Duration::from_secs(2)]);
    assert_eq!(h.pasted(), vec![CORRECTED.to_string()]);
    assert!(matches!(
        h.drain().last(),
        Some(WorkflowEvent::WorkflowComplete { success: true })
    ));
}

#[tokio::test]
async fn empty_selection_skips_correction() {
    let mut h = Harness::new("", ScriptedCorrector::default());

    assert_eq!(h.workflow.run().await, Some(false));

    assert_eq!(h.corrector.calls(), 0);
    assert!(h.pasted().is_empty());
    assert_eq!(h.clipboard(), ORIGINAL_CLIPBOARD);
    assert_eq!(h.restores(), 1);
    let events = h.drain();
    assert_eq!(
        status_of(&events),
        vec![("No text was detected.".to_string(), true)]
    );
    assert_eq!(
        events.last(),
        Some(&WorkflowEvent::WorkflowComplete { success: false })
    );
}

#[tokio::test]
async fn authentication_failure_is_not_retried() {
    let corrector = ScriptedCorrector::with_script(vec![Err(CorrectionFailure::classified(
        "HTTP 401 Unauthorized: Incorrect API key provided",
    ))]);
    let mut h = Harness::new(SELECTED, corrector);

    assert_eq!(h.workflow.run().await, Some(false));

    assert_eq!(h.corrector.calls(), 1);
    assert!(h.backoff.0.lock().unwrap().is_empty());
    assert!(h.pasted().is_empty());
    assert_eq!(h.clipboard(), ORIGINAL_CLIPBOARD);
    assert_eq!(
        status_of(&h.drain()),
        vec![(
            ErrorKind::AuthenticationFailure.user_message().to_string(),
            true
        )]
    );
}

#[tokio::test]
async fn missing_credential_fails_without_calling_service() {
    let mut h = Harness::build(SELECTED, ScriptedCorrector::default(), None, false);

    assert_eq!(h.workflow.run().await, Some(false));

    assert_eq!(h.corrector.calls(), 0);
    assert_eq!(h.clipboard(), ORIGINAL_CLIPBOARD);
    assert_eq!(
        status_of(&h.drain()),
        vec![("Error: no API key configured.".to_string(), true)]
    );
}

#[tokio::test]
async fn paste_failure_keeps_corrected_text_visible() {
    let mut h = Harness::build(SELECTED, ScriptedCorrector::default(), Some("sk-test"), true);

    assert_eq!(h.workflow.run().await, Some(false));

    assert_eq!(h.clipboard(), ORIGINAL_CLIPBOARD);
    assert_eq!(h.restores(), 1);
    let events = h.drain();
    assert!(events.contains(&WorkflowEvent::text_result(SELECTED, CORRECTED)));
    let statuses = status_of(&events);
    assert_eq!(statuses.len(), 1);
    assert!(statuses[0].0.contains("could not be pasted"));
    assert_eq!(
        events.last(),
        Some(&WorkflowEvent::WorkflowComplete { success: false })
    );
}

#[tokio::test]
async fn second_trigger_is_dropped_while_running() {
    let gate = Arc::new(Notify::new());
    let corrector = ScriptedCorrector {
        gate: Some(Arc::clone(&gate)),
        ..ScriptedCorrector::default()
    };
    let h = Harness::new(SELECTED, corrector);

    let first = h.workflow.spawn().expect("first trigger starts");
    while h.corrector.calls() == 0 {
        tokio::task::yield_now().await;
    }

    assert!(h.workflow.is_running());
    assert!(!h.workflow.trigger());
    assert!(h.workflow.spawn().is_none());

    gate.notify_one();
    assert!(first.await.unwrap());
    assert!(!h.workflow.is_running());
    assert_eq!(h.corrector.calls(), 1);

    // Lock released: the next trigger runs again
    let again = h.workflow.spawn().expect("lock released after cleanup");
    while h.corrector.calls() < 2 {
        tokio::task::yield_now().await;
    }
    gate.notify_one();
    assert!(again.await.unwrap());
    assert_eq!(h.pasted().len(), 2);
}
