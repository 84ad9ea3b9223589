//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod clipboard;
pub mod config;
pub mod corrector;
pub mod delay;
pub mod keystroke;
pub mod notifier;
pub mod selection;

// Re-export common types
pub use clipboard::{Clipboard, ClipboardError};
pub use config::ConfigStore;
pub use corrector::Corrector;
pub use delay::Delay;
pub use keystroke::{KeyChord, Keystroke, KeystrokeError};
pub use notifier::{NotificationError, NotificationIcon, Notifier};
pub use selection::{SelectionError, TextSelection};
