//! Correction request value object

/// Number of characters kept when logging a text preview
pub const PREVIEW_CHARS: usize = 70;

/// Immutable request to correct a piece of text.
/// The text is guaranteed to be non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectionRequest {
    text: String,
}

impl CorrectionRequest {
    /// Create a request, returning `None` for empty text
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.is_empty() {
            None
        } else {
            Some(Self { text })
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Short prefix of the text for log lines
    pub fn preview(&self) -> String {
        preview(&self.text)
    }
}

/// First [`PREVIEW_CHARS`] characters of `text`, with an ellipsis if cut
pub fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_rejected() {
        assert!(CorrectionRequest::new("").is_none());
    }

    #[test]
    fn non_empty_text_is_kept_verbatim() {
        let request = CorrectionRequest::new("  ola  ").unwrap();
        assert_eq!(request.text(), "  ola  ");
    }

    #[test]
    fn preview_truncates_on_char_boundaries() {
        let text = "é".repeat(100);
        let p = preview(&text);
        assert_eq!(p.chars().count(), PREVIEW_CHARS + 3);
        assert!(p.ends_with("..."));
    }

    #[test]
    fn preview_keeps_short_text() {
        assert_eq!(preview("curto"), "curto");
    }
}
