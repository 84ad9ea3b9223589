//! Correction prompt value object

/// Instruction used when no custom prompt is configured
const DEFAULT_INSTRUCTION: &str = "You are an expert proofreader for Brazilian Portuguese. \
Your task is to correct the grammar, spelling and punctuation of the text you receive. \
Keep the original meaning, tone and style as much as possible. \
Reply ONLY with the corrected text, without introductions, greetings, explanations or comments. \
If the text is already correct, return it unchanged.";

/// System instruction sent with every correction request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectionPrompt {
    content: String,
}

impl CorrectionPrompt {
    /// Use a custom instruction, falling back to the default when blank
    pub fn custom(content: impl Into<String>) -> Self {
        let content = content.into();
        if content.trim().is_empty() {
            Self::default()
        } else {
            Self { content }
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

impl Default for CorrectionPrompt {
    fn default() -> Self {
        Self {
            content: DEFAULT_INSTRUCTION.to_string(),
        }
    }
}

impl From<Option<String>> for CorrectionPrompt {
    fn from(value: Option<String>) -> Self {
        value.map(Self::custom).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_asks_for_corrected_text_only() {
        let prompt = CorrectionPrompt::default();
        assert!(prompt.content().contains("Brazilian Portuguese"));
        assert!(prompt.content().contains("ONLY with the corrected text"));
    }

    #[test]
    fn blank_custom_prompt_falls_back() {
        assert_eq!(CorrectionPrompt::custom("   "), CorrectionPrompt::default());
    }

    #[test]
    fn custom_prompt_is_kept() {
        let prompt = CorrectionPrompt::from(Some("Fix English typos.".to_string()));
        assert_eq!(prompt.content(), "Fix English typos.");
    }
}
