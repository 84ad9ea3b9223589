//! Texta - select text anywhere, press a hotkey, get it proofread
//!
//! The selected text is copied, sent to an OpenAI-compatible model with a
//! proofreading instruction, and the corrected text is pasted back in place.
//! The user's clipboard is restored afterwards.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Error classification, retry policy, hotkeys, config and workflow stages
//! - **Application**: The retrying correction service, the workflow and port traits
//! - **Infrastructure**: Adapters (OpenAI, arboard, enigo, global-hotkey, notify-rust, etc.)
//! - **CLI**: Argument parsing, terminal presentation, IPC and the service runner

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
