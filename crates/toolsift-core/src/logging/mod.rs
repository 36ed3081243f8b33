//! Logging abstractions for runtime-agnostic logging
//!
//! Components that do I/O or hold session state take an `Arc<dyn Logger>`;
//! the relevance filter itself never logs.

mod traits;
mod noop;
mod console;

pub use traits::{Logger, LogLevel};
pub use noop::{NoOpLogger, MemoryLogger};
pub use console::{ConsoleLogger, LOG_LEVEL_ENV};
