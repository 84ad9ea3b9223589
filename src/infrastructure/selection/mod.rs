//! Selected-text capture via the clipboard

mod clipboard_selection;

pub use clipboard_selection::{ClipboardSelection, SelectionTimings};
