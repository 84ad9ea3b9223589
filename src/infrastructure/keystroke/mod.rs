//! Keystroke infrastructure module
//!
//! Sends the copy/paste shortcuts using enigo (primary) or one of the
//! Linux command-line tools.

mod enigo;
mod factory;
mod noop;
mod wtype;
mod xdotool;
mod ydotool;

pub use enigo::EnigoKeystroke;
pub use factory::{
    create_keystroke, detect_keystroke_tool, KeystrokeTool, KeystrokeToolPreference,
    ParseKeystrokeToolError,
};
pub use noop::NoOpKeystroke;
pub use wtype::WtypeKeystroke;
pub use xdotool::XdotoolKeystroke;
pub use ydotool::YdotoolKeystroke;

use std::io;
use std::process::Stdio;

use tokio::process::Command;

use crate::application::ports::{KeyChord, KeystrokeError};

/// Run `tool` with `args`, mapping spawn and exit failures for `chord`
async fn run_tool(tool: &'static str, args: &[&str], chord: KeyChord) -> Result<(), KeystrokeError> {
    let status = Command::new(tool)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                KeystrokeError::ToolNotFound(tool)
            } else {
                KeystrokeError::SendFailed {
                    chord,
                    message: e.to_string(),
                }
            }
        })?;

    if !status.success() {
        return Err(KeystrokeError::SendFailed {
            chord,
            message: format!("{} exited with status: {}", tool, status),
        });
    }

    Ok(())
}
