//! Events sent from the workflow to the presentation layer

/// One-way notification for whoever renders workflow progress
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowEvent {
    AnimationStart,
    AnimationClose,
    Status { message: String, is_error: bool },
    /// `corrected` is empty until the correction has finished
    TextResult { original: String, corrected: String },
    WorkflowComplete { success: bool },
}

impl WorkflowEvent {
    pub fn status(message: impl Into<String>, is_error: bool) -> Self {
        Self::Status {
            message: message.into(),
            is_error,
        }
    }

    pub fn text_result(original: impl Into<String>, corrected: impl Into<String>) -> Self {
        Self::TextResult {
            original: original.into(),
            corrected: corrected.into(),
        }
    }
}
