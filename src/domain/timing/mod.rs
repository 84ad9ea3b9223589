//! Timing value objects

mod duration;

pub use duration::{Duration, DEFAULT_REQUEST_TIMEOUT_SECS};
