//! Correction client adapters

mod openai;

pub use openai::{OpenAiCorrector, DEFAULT_TEMPERATURE};
