//! High-level flash operations
//!
//! This module provides the erase and program sequences run through the
//! helper algorithm, progress reporting, and the generic driver interface.

mod driver;
mod operations;
mod progress;

pub use driver::FlashDriver;
pub use progress::{NoProgress, Progress};
