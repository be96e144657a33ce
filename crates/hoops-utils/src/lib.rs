//! Shared utilities for hoops-bot
//!
//! Logging setup and the small helpers shared by the library and the CLI.

pub mod logging;
pub mod text;

pub use logging::{LogFormat, init_tracing};
pub use text::truncate_chars;
