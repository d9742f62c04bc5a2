//! ccflash-core - Core library for TI CC26xx/CC13xx flash programming
//!
//! This crate drives the on-chip flash of CC26xx and CC13xx devices through
//! a debug target. It identifies the device from its identification
//! registers, uploads a flash helper algorithm into target RAM and streams
//! erase and program commands to it through a double-buffered command
//! channel. It is `no_std` compatible and only needs an allocator.
//!
//! # Features
//!
//! - `std` - Enable standard library support: loading algorithm images and
//!   TOML configuration files, `std::error::Error` impls
//!
//! # Example
//!
//! ```ignore
//! use ccflash_core::{AlgorithmImages, BankConfig, Cc26xxBank, NoProgress};
//!
//! fn flash<T: ccflash_core::DebugTarget>(target: T, images: AlgorithmImages, image: &[u8]) {
//!     let mut bank = Cc26xxBank::new(target, BankConfig::default(), images);
//!     match bank.probe() {
//!         Ok(()) => println!("{}", bank.info_string()),
//!         Err(e) => println!("Probe failed: {}", e),
//!     }
//!     bank.mass_erase(&mut NoProgress).unwrap();
//!     bank.program(0, image, &mut NoProgress).unwrap();
//! }
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod algo;
pub mod bank;
pub mod device;
pub mod error;
pub mod flash;
pub mod target;

pub use algo::{AlgorithmImages, FamilyProfile};
pub use bank::{BankConfig, Cc26xxBank, EraseState, Sector};
pub use device::{DeviceIdentity, DeviceType, Family};
pub use error::{Error, Result};
pub use flash::{FlashDriver, NoProgress, Progress};
pub use target::{DebugTarget, ExecutionContext, WorkingArea};
