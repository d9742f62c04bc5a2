//! Double-buffered command channel to the running helper algorithm
//!
//! The algorithm owns two slots, each with a data buffer and a parameter
//! block. The host fills one slot while the algorithm works on the other.
//! A slot may only be rewritten once the algorithm has cleared its status
//! word, so every submission waits on the slot that is about to be reused.

use super::layout::{AlgoLayout, Slot};
use super::params::{AlgoParamBlock, BufferStatus, Command};
use crate::device::Family;
use crate::error::{Error, Result};
use crate::target::DebugTarget;
use zerocopy::IntoBytes;

/// Time after which a pending flash command is considered failed
pub const FLASH_TIMEOUT_MS: u32 = 8000;

/// Elapsed time after which the controlling process is kept alive
pub const KEEP_ALIVE_THRESHOLD_MS: u64 = 500;

/// Handle for issuing commands to a started helper algorithm
pub struct CommandChannel<'a, T: DebugTarget + ?Sized> {
    target: &'a mut T,
    layout: &'static AlgoLayout,
    family: Family,
    current: Slot,
}

impl<'a, T: DebugTarget + ?Sized> CommandChannel<'a, T> {
    /// Open a channel on a freshly started algorithm; slot 0 is current
    pub fn new(target: &'a mut T, layout: &'static AlgoLayout, family: Family) -> Self {
        Self {
            target,
            layout,
            family,
            current: Slot::First,
        }
    }

    /// Slot the next command goes to
    pub fn current(&self) -> Slot {
        self.current
    }

    /// Family the channel was opened for
    pub fn family(&self) -> Family {
        self.family
    }

    /// Underlying target
    pub fn target(&mut self) -> &mut T {
        self.target
    }

    /// Data buffer address of a slot
    pub fn slot_buffer(&self, slot: Slot) -> u32 {
        self.layout.slot(slot).buffer
    }

    /// Copy data into a slot's buffer
    ///
    /// Only safe for the current slot, or for either slot before the first
    /// command has been issued.
    pub fn write_buffer(&mut self, slot: Slot, data: &[u8]) -> Result<()> {
        let addr = self.slot_buffer(slot);
        self.target.write_memory(addr, data).inspect_err(|_| {
            log::error!("Unable to write data to target memory");
        })
    }

    /// Copy data into the current slot's buffer
    pub fn load_buffer(&mut self, data: &[u8]) -> Result<()> {
        self.write_buffer(self.current, data)
    }

    fn write_block(&mut self, command: Command, address: u32, length: u32) -> Result<()> {
        let slot = self.layout.slot(self.current);
        let block = AlgoParamBlock::new(command, address, length, slot.buffer);
        log::trace!(
            "slot {}: {:?} addr=0x{:08X} len=0x{:X}",
            self.current.index(),
            command,
            address,
            length
        );
        self.target.write_memory(slot.params, block.as_bytes())
    }

    fn wait_current(&mut self) -> Result<()> {
        let status = self.layout.slot(self.current).status;
        wait_for_completion(self.target, status, self.family)
    }

    /// Issue a command on the current slot and move to the other one
    ///
    /// Before returning, waits for the other slot to drain so the caller
    /// can immediately refill it. This leaves at most one command in
    /// flight while the next is being prepared.
    pub fn submit(&mut self, command: Command, address: u32, length: u32) -> Result<()> {
        self.write_block(command, address, length)?;
        self.current = self.current.flip();
        self.wait_current()
    }

    /// Wait for the last command issued through [`submit`](Self::submit)
    pub fn finish(&mut self) -> Result<()> {
        self.current = self.current.flip();
        self.wait_current()
    }

    /// Issue a command on the current slot and wait for that same slot
    pub fn submit_and_await(&mut self, command: Command, address: u32, length: u32) -> Result<()> {
        self.write_block(command, address, length)?;
        self.wait_current()
    }
}

/// Poll a slot's status word until the algorithm has consumed the command
///
/// The keep-alive is sent on every poll once more than
/// [`KEEP_ALIVE_THRESHOLD_MS`] have passed; polling gives up after
/// [`FLASH_TIMEOUT_MS`]. Anything other than an empty slot at that point
/// is a failed flash operation.
pub fn wait_for_completion<T: DebugTarget + ?Sized>(
    target: &mut T,
    status_addr: u32,
    family: Family,
) -> Result<()> {
    let start = target.now_ms();
    let mut status = BufferStatus::FULL;

    while status == BufferStatus::FULL {
        status = target.read_u32(status_addr)?;

        let elapsed = target.now_ms().saturating_sub(start);
        if elapsed > KEEP_ALIVE_THRESHOLD_MS {
            target.keep_alive();
        }
        if elapsed > u64::from(FLASH_TIMEOUT_MS) {
            break;
        }
    }

    if status != BufferStatus::EMPTY {
        log::error!("{}: Flash operation failed", family);
        return Err(Error::FlashOperationFailed { family });
    }

    Ok(())
}
