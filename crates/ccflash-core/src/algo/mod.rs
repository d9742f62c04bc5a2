//! Flash helper algorithm support
//!
//! The helper algorithm is a small program that runs from target RAM and
//! performs the actual erase and program operations. The host uploads it,
//! starts it and then feeds it commands through two parameter blocks in
//! target memory.

pub mod channel;
mod image;
pub mod layout;
mod lifecycle;
pub mod params;
mod profile;

pub use channel::{wait_for_completion, CommandChannel, FLASH_TIMEOUT_MS, KEEP_ALIVE_THRESHOLD_MS};
pub use image::AlgorithmImages;
#[cfg(feature = "std")]
pub use image::ImageError;
pub use layout::{layout_for, AlgoLayout, Slot, SlotAddresses, ALGO_BASE_ADDRESS};
pub use params::{AlgoParamBlock, BufferStatus, Command, PARAM_BLOCK_SIZE};
pub use profile::FamilyProfile;
