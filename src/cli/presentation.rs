//! Terminal rendering of workflow events
//!
//! The spinner stands in for the animation, status lines and desktop
//! notifications report each outcome, and the text panel echoes the
//! original and corrected text when toggled on.

use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, warn};

use crate::application::ports::{NotificationIcon, Notifier};
use crate::application::WorkflowEvent;
use crate::infrastructure::notification::APP_NAME;

use super::presenter::Presenter;

/// Spinner message while a workflow is running
const WORKING_MESSAGE: &str = "Correcting selected text...";

/// Last original/corrected pair and whether it is shown
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TextPanel {
    visible: bool,
    original: String,
    corrected: String,
}

impl TextPanel {
    pub fn new(visible: bool) -> Self {
        Self {
            visible,
            ..Self::default()
        }
    }

    /// Flip visibility, returning the new state
    pub fn toggle(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn update(&mut self, original: &str, corrected: &str) {
        self.original = original.to_string();
        self.corrected = corrected.to_string();
    }

    /// Texts to render, `None` before the first capture
    pub fn contents(&self) -> Option<(&str, &str)> {
        if self.original.is_empty() {
            None
        } else {
            Some((&self.original, &self.corrected))
        }
    }
}

/// Consumes [`WorkflowEvent`]s and renders them
pub struct PresentationAdapter<N: Notifier> {
    presenter: Presenter,
    notifier: Option<N>,
    panel: TextPanel,
    last_status: Option<(String, bool)>,
    unpasted: Option<String>,
}

impl<N: Notifier> PresentationAdapter<N> {
    /// `notifier` is `None` when desktop notifications are off
    pub fn new(presenter: Presenter, notifier: Option<N>) -> Self {
        Self {
            presenter,
            notifier,
            panel: TextPanel::default(),
            last_status: None,
            unpasted: None,
        }
    }

    pub fn panel(&self) -> &TextPanel {
        &self.panel
    }

    /// Show or hide the text panel
    pub fn toggle_panel(&mut self) {
        if self.panel.toggle() {
            self.presenter.info("Text panel shown");
            if let Some((original, corrected)) = self.panel.contents() {
                self.presenter.panel(original, corrected);
            }
        } else {
            self.presenter.info("Text panel hidden");
        }
    }

    pub async fn handle(&mut self, event: WorkflowEvent) {
        match event {
            WorkflowEvent::AnimationStart => {
                self.last_status = None;
                self.unpasted = None;
                self.presenter.start_spinner(WORKING_MESSAGE);
            }
            WorkflowEvent::TextResult {
                original,
                corrected,
            } => {
                self.panel.update(&original, &corrected);
                if corrected.is_empty() {
                    return;
                }
                self.unpasted = Some(corrected);
                if self.panel.is_visible() {
                    if let Some((original, corrected)) = self.panel.contents() {
                        self.presenter.panel(original, corrected);
                    }
                }
            }
            WorkflowEvent::Status { message, is_error } => {
                if !is_error {
                    self.unpasted = None;
                }
                self.presenter.update_spinner(&message);
                self.send_notification(&message, is_error).await;
                self.last_status = Some((message, is_error));
            }
            WorkflowEvent::AnimationClose => self.finish_spinner(),
            WorkflowEvent::WorkflowComplete { success } => {
                debug!(success, "Workflow completion rendered");
                if self.presenter.is_spinner_active() {
                    self.finish_spinner();
                }
            }
        }
    }

    /// Render events until the workflow side goes away
    pub async fn run(
        mut self,
        mut events: UnboundedReceiver<WorkflowEvent>,
        mut panel_toggles: UnboundedReceiver<()>,
    ) {
        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => self.handle(event).await,
                    None => break,
                },
                Some(()) = panel_toggles.recv() => self.toggle_panel(),
            }
        }
        self.presenter.stop_spinner();
    }

    fn finish_spinner(&mut self) {
        match self.last_status.take() {
            Some((message, true)) => {
                self.presenter.spinner_fail(&message);
                // Corrected but never pasted: keep it reachable
                if let Some(corrected) = self.unpasted.take() {
                    self.presenter.warn("Corrected text:");
                    self.presenter.output(&corrected);
                }
            }
            Some((message, false)) => self.presenter.spinner_success(&message),
            None => self.presenter.stop_spinner(),
        }
    }

    async fn send_notification(&self, message: &str, is_error: bool) {
        let Some(ref notifier) = self.notifier else {
            return;
        };
        if let Err(e) = notifier
            .notify(APP_NAME, message, NotificationIcon::for_status(is_error))
            .await
        {
            warn!(error = %e, "Desktop notification failed");
        }
    }
}
