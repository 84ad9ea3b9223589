//! Global hotkey adapter

mod listener;

pub use listener::{GlobalHotkeyListener, HotkeyAction, HotkeyError};
