//! Debug target abstraction
//!
//! This module defines the collaborator interface the driver consumes from
//! the debug-probe side.

mod traits;

pub use traits::*;
