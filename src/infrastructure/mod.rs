//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with the clipboard, the keyboard, the OpenAI API, etc.

pub mod clipboard;
pub mod config;
pub mod correction;
pub mod delay;
pub mod hotkey;
pub mod keystroke;
pub mod notification;
pub mod selection;

// Re-export adapters
pub use clipboard::{create_clipboard, ArboardClipboard, WaylandClipboard};
pub use config::XdgConfigStore;
pub use correction::OpenAiCorrector;
pub use delay::TokioDelay;
pub use hotkey::{GlobalHotkeyListener, HotkeyAction, HotkeyError};
pub use keystroke::{create_keystroke, KeystrokeTool, KeystrokeToolPreference, NoOpKeystroke};
pub use notification::{create_notifier, NotifyRustNotifier};
pub use selection::{ClipboardSelection, SelectionTimings};
