//! Utility modules
//!
//! - Structured logging setup and configuration
//! - Text helpers for prompt and report shaping

pub mod logging;
pub mod text;

pub use logging::{init_default, init_from_env, init_logging, LoggingConfig};
