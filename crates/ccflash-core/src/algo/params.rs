//! Parameter block exchanged with the helper algorithm
//!
//! The block is five little-endian words. The host fills it in and writes
//! it to a slot's parameter address; the algorithm clears the status word
//! once it has consumed the command.

use zerocopy::byteorder::little_endian::U32;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use super::layout::STATUS_OFFSET;

/// Commands understood by the helper algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Command {
    /// Mass erase the main flash bank
    EraseAll = 1,
    /// Program the buffer without erasing first
    Program = 2,
    /// Erase the sector containing the address, then program the buffer
    EraseAndProgram = 3,
}

impl Command {
    /// Decode a raw command word
    pub const fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            1 => Some(Command::EraseAll),
            2 => Some(Command::Program),
            3 => Some(Command::EraseAndProgram),
            _ => None,
        }
    }

    /// Raw command word
    pub const fn raw(self) -> u32 {
        self as u32
    }
}

/// Slot status word values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferStatus {
    /// The algorithm has consumed the command
    Empty,
    /// A command is pending or in progress
    Full,
}

impl BufferStatus {
    /// Raw value of an empty slot
    pub const EMPTY: u32 = 0x0000_0000;
    /// Raw value of a full slot
    pub const FULL: u32 = 0xFFFF_FFFF;

    /// Decode a raw status word
    pub const fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            Self::EMPTY => Some(BufferStatus::Empty),
            Self::FULL => Some(BufferStatus::Full),
            _ => None,
        }
    }

    /// Raw status word
    pub const fn raw(self) -> u32 {
        match self {
            BufferStatus::Empty => Self::EMPTY,
            BufferStatus::Full => Self::FULL,
        }
    }
}

/// Parameter block as laid out in target memory
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct AlgoParamBlock {
    /// Absolute flash address the command operates on
    pub address: U32,
    /// Number of bytes
    pub length: U32,
    /// Raw [`Command`]
    pub command: U32,
    /// Raw [`BufferStatus`]
    pub status: U32,
    /// Address of the data buffer
    pub buffer: U32,
}

/// Size of a parameter block in bytes
pub const PARAM_BLOCK_SIZE: usize = core::mem::size_of::<AlgoParamBlock>();

const _: () = assert!(PARAM_BLOCK_SIZE == 20);
const _: () = assert!(STATUS_OFFSET as usize == 3 * core::mem::size_of::<U32>());

impl AlgoParamBlock {
    /// Build a freshly issued block; its status is always full
    pub fn new(command: Command, address: u32, length: u32, buffer: u32) -> Self {
        Self {
            address: U32::new(address),
            length: U32::new(length),
            command: U32::new(command.raw()),
            status: U32::new(BufferStatus::FULL),
            buffer: U32::new(buffer),
        }
    }

    /// Decoded command, if the command word is valid
    pub fn command(&self) -> Option<Command> {
        Command::from_raw(self.command.get())
    }

    /// Decoded status, if the status word is valid
    pub fn status(&self) -> Option<BufferStatus> {
        BufferStatus::from_raw(self.status.get())
    }

    /// Parse a block from raw target memory
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        Self::read_from_bytes(bytes).ok()
    }
}
