//! spacedeck-hints: Advisory hint text for study sessions.
//!
//! Implements the `HintProvider` trait for Google Gemini and an offline
//! template fallback, and wraps any provider with a timeout so a slow or
//! broken service only ever produces a readable fallback message.

pub mod config;
pub mod error;
pub mod fetch;
pub mod gemini;
pub mod mock;
pub mod offline;

pub use config::{create_provider, load_config, HintsConfig, SpacedeckConfig};
pub use error::HintError;
pub use fetch::{fetch_hint, HintOutcome};
