//! Capture and paste by driving the clipboard with copy/paste shortcuts

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::application::ports::{
    Clipboard, Delay, KeyChord, Keystroke, SelectionError, TextSelection,
};

/// Waits that let the focused application react to synthetic shortcuts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionTimings {
    /// After sending Copy, and before each extra try
    pub copy_settle: Duration,
    /// Extra Copy-and-read tries when the clipboard is still empty
    pub extra_tries: u32,
    /// Between writing the text and sending Paste
    pub before_paste: Duration,
    /// After sending Paste, so the target reads the clipboard before it changes
    pub after_paste: Duration,
}

impl Default for SelectionTimings {
    fn default() -> Self {
        Self {
            copy_settle: Duration::from_millis(300),
            extra_tries: 2,
            before_paste: Duration::from_millis(300),
            after_paste: Duration::from_millis(100),
        }
    }
}

/// [`TextSelection`] built from a clipboard, a keystroke sender and a delay.
///
/// Capture clears the clipboard first so that an unchanged clipboard is not
/// mistaken for a selection.
pub struct ClipboardSelection<C, K, D>
where
    C: Clipboard,
    K: Keystroke,
    D: Delay,
{
    clipboard: C,
    keystroke: K,
    delay: D,
    timings: SelectionTimings,
}

impl<C, K, D> ClipboardSelection<C, K, D>
where
    C: Clipboard,
    K: Keystroke,
    D: Delay,
{
    pub fn new(clipboard: C, keystroke: K, delay: D) -> Self {
        Self {
            clipboard,
            keystroke,
            delay,
            timings: SelectionTimings::default(),
        }
    }

    pub fn with_timings(mut self, timings: SelectionTimings) -> Self {
        self.timings = timings;
        self
    }
}

#[async_trait]
impl<C, K, D> TextSelection for ClipboardSelection<C, K, D>
where
    C: Clipboard,
    K: Keystroke,
    D: Delay,
{
    async fn capture(&self) -> Result<Option<String>, SelectionError> {
        self.clipboard.write("").await?;
        self.keystroke.send(KeyChord::Copy).await?;
        self.delay.wait(self.timings.copy_settle).await;

        let mut text = self.clipboard.read().await?;
        let mut tries = 1;
        // Some applications drop the first shortcut, so each extra try copies again
        while text.is_empty() && tries <= self.timings.extra_tries {
            debug!(attempt = tries + 1, "Clipboard still empty after copy, copying again");
            self.delay.wait(self.timings.copy_settle).await;
            self.keystroke.send(KeyChord::Copy).await?;
            self.delay.wait(self.timings.copy_settle).await;
            text = self.clipboard.read().await?;
            tries += 1;
        }

        if text.is_empty() {
            warn!("Nothing copied from the selection");
            return Ok(None);
        }

        debug!(chars = text.chars().count(), "Copied selection");
        Ok(Some(text))
    }

    async fn paste(&self, text: &str) -> Result<(), SelectionError> {
        if text.is_empty() {
            debug!("Nothing to paste");
            return Ok(());
        }

        self.clipboard.write(text).await?;
        self.delay.wait(self.timings.before_paste).await;
        self.keystroke.send(KeyChord::Paste).await?;
        self.delay.wait(self.timings.after_paste).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{ClipboardError, KeystrokeError};
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Shared log of everything the adapters were asked to do
    type Log = Arc<Mutex<Vec<String>>>;

    struct FakeClipboard {
        log: Log,
        reads: Mutex<VecDeque<String>>,
    }

    #[async_trait]
    impl Clipboard for FakeClipboard {
        async fn read(&self) -> Result<String, ClipboardError> {
            self.log.lock().unwrap().push("read".into());
            Ok(self.reads.lock().unwrap().pop_front().unwrap_or_default())
        }

        async fn write(&self, text: &str) -> Result<(), ClipboardError> {
            self.log.lock().unwrap().push(format!("write:{text}"));
            Ok(())
        }
    }

    struct FakeKeystroke {
        log: Log,
        fail: bool,
    }

    #[async_trait]
    impl Keystroke for FakeKeystroke {
        async fn send(&self, chord: KeyChord) -> Result<(), KeystrokeError> {
            if self.fail {
                return Err(KeystrokeError::ToolNotFound("xdotool"));
            }
            self.log.lock().unwrap().push(format!("key:{}", chord.letter()));
            Ok(())
        }
    }

    struct FakeDelay {
        log: Log,
    }

    #[async_trait]
    impl Delay for FakeDelay {
        async fn wait(&self, duration: Duration) {
            self.log
                .lock()
                .unwrap()
                .push(format!("wait:{}", duration.as_millis()));
        }
    }

    fn selection(
        reads: &[&str],
        fail_keys: bool,
    ) -> (ClipboardSelection<FakeClipboard, FakeKeystroke, FakeDelay>, Log) {
        let log: Log = Arc::default();
        let selection = ClipboardSelection::new(
            FakeClipboard {
                log: Arc::clone(&log),
                reads: Mutex::new(reads.iter().map(|s| s.to_string()).collect()),
            },
            FakeKeystroke {
                log: Arc::clone(&log),
                fail: fail_keys,
            },
            FakeDelay {
                log: Arc::clone(&log),
            },
        );
        (selection, log)
    }

    fn entries(log: &Log) -> Vec<String> {
        log.lock().unwrap().clone()
    }

    #[tokio::test]
    async fn capture_clears_copies_then_reads() {
        let (selection, log) = selection(&["selected"], false);

        assert_eq!(selection.capture().await.unwrap(), Some("selected".into()));
        assert_eq!(entries(&log), ["write:", "key:c", "wait:300", "read"]);
    }

    #[tokio::test]
    async fn capture_retries_while_clipboard_is_empty() {
        let (selection, log) = selection(&["", "late"], false);

        assert_eq!(selection.capture().await.unwrap(), Some("late".into()));
        assert_eq!(
            entries(&log),
            [
                "write:", "key:c", "wait:300", "read", "wait:300", "key:c", "wait:300", "read"
            ]
        );
    }

    #[tokio::test]
    async fn capture_gives_up_after_extra_tries() {
        let (selection, log) = selection(&[], false);

        assert_eq!(selection.capture().await.unwrap(), None);
        let log = entries(&log);
        assert_eq!(log.iter().filter(|e| *e == "read").count(), 3);
        assert_eq!(log.iter().filter(|e| *e == "key:c").count(), 3);
        assert_eq!(log.last().map(String::as_str), Some("read"));
    }

    /// Clipboard that only fills once the application has seen `needed` copies
    struct StubbornApp {
        copies: Mutex<u32>,
        needed: u32,
    }

    struct StubbornClipboard(Arc<StubbornApp>);

    #[async_trait]
    impl Clipboard for StubbornClipboard {
        async fn read(&self) -> Result<String, ClipboardError> {
            let copies = *self.0.copies.lock().unwrap();
            Ok(if copies >= self.0.needed {
                "sel".to_string()
            } else {
                String::new()
            })
        }

        async fn write(&self, _text: &str) -> Result<(), ClipboardError> {
            Ok(())
        }
    }

    struct StubbornKeystroke(Arc<StubbornApp>);

    #[async_trait]
    impl Keystroke for StubbornKeystroke {
        async fn send(&self, chord: KeyChord) -> Result<(), KeystrokeError> {
            if chord == KeyChord::Copy {
                *self.0.copies.lock().unwrap() += 1;
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn capture_recovers_from_dropped_copy_shortcut() {
        for needed in [2, 3] {
            let app = Arc::new(StubbornApp {
                copies: Mutex::new(0),
                needed,
            });
            let selection = ClipboardSelection::new(
                StubbornClipboard(Arc::clone(&app)),
                StubbornKeystroke(Arc::clone(&app)),
                FakeDelay { log: Log::default() },
            );

            assert_eq!(selection.capture().await.unwrap(), Some("sel".into()));
            assert_eq!(*app.copies.lock().unwrap(), needed);
        }
    }

    #[tokio::test]
    async fn capture_propagates_keystroke_errors() {
        let (selection, _log) = selection(&["x"], true);

        assert!(matches!(
            selection.capture().await,
            Err(SelectionError::Keystroke(_))
        ));
    }

    #[tokio::test]
    async fn paste_writes_waits_and_sends_paste() {
        let (selection, log) = selection(&[], false);

        selection.paste("corrigido").await.unwrap();
        assert_eq!(
            entries(&log),
            ["write:corrigido", "wait:300", "key:v", "wait:100"]
        );
    }

    #[tokio::test]
    async fn empty_paste_is_a_no_op() {
        let (selection, log) = selection(&[], false);

        selection.paste("").await.unwrap();
        assert!(entries(&log).is_empty());
    }
}
