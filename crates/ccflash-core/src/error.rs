//! Error types for ccflash-core
//!
//! This module provides a no_std compatible error type that can be used
//! throughout the crate.

use core::fmt;

use crate::device::Family;

/// Core error type - no_std compatible, Copy for efficiency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    // Precondition errors
    /// Target must be halted before this operation
    TargetNotHalted,
    /// Bank has not been probed yet
    NotProbed,
    /// Bank number is not handled by this driver
    InvalidBank,

    // Resource errors
    /// Working area reservation could not be granted
    WorkingAreaUnavailable,
    /// Working area was granted at an address the algorithm cannot run from
    WorkingAreaMismatch {
        /// Address the algorithm image is linked for
        expected: u32,
        /// Address the target actually granted
        actual: u32,
    },
    /// No helper algorithm image is available for the detected family
    AlgorithmImageMissing,

    // Transport errors
    /// Reading target memory failed
    TargetRead {
        /// Address of the failed access
        addr: u32,
    },
    /// Writing target memory failed
    TargetWrite {
        /// Address of the failed access
        addr: u32,
    },
    /// Target could not be halted
    HaltFailed,

    // Algorithm errors
    /// Helper algorithm could not be started
    AlgorithmStart,
    /// Helper algorithm did not return control in time
    AlgorithmTimeout,
    /// Helper algorithm did not acknowledge a command
    FlashOperationFailed {
        /// Device family the algorithm was running for
        family: Family,
    },

    // Argument errors
    /// Too few or malformed arguments for a bank definition
    CommandSyntax,
    /// Sector range is outside the bank
    SectorOutOfRange,
    /// Address range is outside the bank
    AddressOutOfBounds,
    /// Provided buffer is too small for the operation
    BufferTooSmall,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TargetNotHalted => write!(f, "target not halted"),
            Self::NotProbed => write!(f, "flash bank not probed"),
            Self::InvalidBank => write!(f, "invalid flash bank number"),
            Self::WorkingAreaUnavailable => write!(f, "working area not available"),
            Self::WorkingAreaMismatch { expected, actual } => write!(
                f,
                "working area granted at 0x{:08X}, algorithm requires 0x{:08X}",
                actual, expected
            ),
            Self::AlgorithmImageMissing => write!(f, "no flash helper algorithm image loaded"),
            Self::TargetRead { addr } => {
                write!(f, "failed to read target memory at 0x{:08X}", addr)
            }
            Self::TargetWrite { addr } => {
                write!(f, "failed to write target memory at 0x{:08X}", addr)
            }
            Self::HaltFailed => write!(f, "failed to halt target"),
            Self::AlgorithmStart => write!(f, "failed to start flash helper algorithm"),
            Self::AlgorithmTimeout => write!(f, "flash helper algorithm timed out"),
            Self::FlashOperationFailed { family } => {
                write!(f, "{}: flash operation failed", family)
            }
            Self::CommandSyntax => write!(f, "command syntax error"),
            Self::SectorOutOfRange => write!(f, "sector out of range"),
            Self::AddressOutOfBounds => write!(f, "address out of bounds"),
            Self::BufferTooSmall => write!(f, "buffer too small"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result type alias using the core Error type
pub type Result<T> = core::result::Result<T, Error>;
