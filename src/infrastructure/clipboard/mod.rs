//! Clipboard infrastructure module
//!
//! Provides cross-platform clipboard support using arboard (primary)
//! or wl-clipboard on Wayland sessions where arboard cannot see the
//! compositor's selection.

mod arboard;
mod wayland;

pub use arboard::ArboardClipboard;
pub use wayland::WaylandClipboard;

use tracing::warn;

use crate::application::ports::Clipboard;

/// Accepted values for `linux.clipboard_tool`
pub const CLIPBOARD_TOOLS: &[&str] = &["arboard", "wl-clipboard"];

/// Create the clipboard adapter for the configured tool.
///
/// Unknown names fall back to arboard.
pub fn create_clipboard(tool: &str) -> Box<dyn Clipboard> {
    match tool {
        "wl-clipboard" | "wayland" => Box::new(WaylandClipboard::new()),
        "arboard" => Box::new(ArboardClipboard::new()),
        other => {
            warn!(tool = other, "Unknown clipboard tool, using arboard");
            Box::new(ArboardClipboard::new())
        }
    }
}
