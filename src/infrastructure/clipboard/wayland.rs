//! Wayland clipboard adapter using wl-clipboard

use std::io;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::application::ports::{Clipboard, ClipboardError};

/// Clipboard adapter shelling out to `wl-paste` / `wl-copy`
#[derive(Debug, Default)]
pub struct WaylandClipboard;

impl WaylandClipboard {
    /// Create a new Wayland clipboard adapter
    pub fn new() -> Self {
        Self
    }
}

fn spawn_error(e: io::Error, wrap: fn(String) -> ClipboardError) -> ClipboardError {
    if e.kind() == io::ErrorKind::NotFound {
        ClipboardError::WlClipboardNotFound
    } else {
        wrap(e.to_string())
    }
}

#[async_trait]
impl Clipboard for WaylandClipboard {
    async fn read(&self) -> Result<String, ClipboardError> {
        let output = Command::new("wl-paste")
            .args(["--no-newline", "--type", "text/plain"])
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| spawn_error(e, ClipboardError::ReadFailed))?;

        if output.status.success() {
            return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
        }

        // wl-paste fails with "Nothing is copied" on an empty clipboard
        let stderr = String::from_utf8_lossy(&output.stderr).to_lowercase();
        if stderr.contains("nothing is copied") || stderr.contains("no suitable type") {
            return Ok(String::new());
        }

        Err(ClipboardError::ReadFailed(format!(
            "wl-paste exited with status: {}",
            output.status
        )))
    }

    async fn write(&self, text: &str) -> Result<(), ClipboardError> {
        let mut child = Command::new("wl-copy")
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| spawn_error(e, ClipboardError::WriteFailed))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .await
                .map_err(|e| ClipboardError::WriteFailed(e.to_string()))?;
        }

        let status = child
            .wait()
            .await
            .map_err(|e| ClipboardError::WriteFailed(e.to_string()))?;

        if !status.success() {
            return Err(ClipboardError::WriteFailed(format!(
                "wl-copy exited with status: {}",
                status
            )));
        }

        Ok(())
    }
}
