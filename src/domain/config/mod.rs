//! Configuration domain

mod app_config;

pub use app_config::{
    AppConfig, LinuxConfig, DEFAULT_API_BASE_URL, DEFAULT_CLIPBOARD_TOOL, DEFAULT_KEYSTROKE_TOOL,
    DEFAULT_MODEL,
};
