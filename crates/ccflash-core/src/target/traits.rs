//! Debug target trait definitions
//!
//! The driver never talks to a debug probe directly. Everything it needs
//! from the probe/target side is expressed by [`DebugTarget`], so the same
//! flash logic runs against a real adapter or against the in-memory
//! simulator used by the tests.

use crate::error::{Error, Result};

/// A region of target RAM reserved for the flash helper algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkingArea {
    /// Start address of the reservation
    pub address: u32,
    /// Size of the reservation in bytes
    pub size: u32,
}

/// Instruction set the algorithm is executed with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InstructionSet {
    /// ARMv7-M Thumb-2 (the only mode a Cortex-M core supports)
    #[default]
    Thumb2,
}

/// Processor mode the algorithm is executed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoreMode {
    /// Thread mode (unprivileged exception level)
    #[default]
    Thread,
    /// Handler mode
    Handler,
}

/// Execution context handed to the target when starting an algorithm
///
/// The same context must be passed back when waiting for the algorithm so
/// the target can restore whatever state it saved at start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExecutionContext {
    /// Instruction set to run the algorithm with
    pub instruction_set: InstructionSet,
    /// Processor mode to run the algorithm in
    pub core_mode: CoreMode,
}

impl ExecutionContext {
    /// Context for running a Cortex-M helper algorithm in thread mode
    pub const fn armv7m_thread() -> Self {
        Self {
            instruction_set: InstructionSet::Thumb2,
            core_mode: CoreMode::Thread,
        }
    }
}

/// Debug target trait
///
/// This trait represents the debug-probe/target collaborator. Implementors
/// provide memory access, working area management, algorithm execution,
/// a monotonic clock and a keep-alive sink.
///
/// ## Errors
///
/// Memory accessors should report `Error::TargetRead` / `Error::TargetWrite`
/// with the failing address. Working area reservation failures should be
/// reported as `Error::WorkingAreaUnavailable`.
pub trait DebugTarget {
    /// Whether the target core is currently halted
    fn is_halted(&self) -> bool;

    /// Request the target core to halt
    fn halt(&mut self) -> Result<()>;

    /// Read target memory into the provided buffer
    ///
    /// # Arguments
    /// * `addr` - Starting address to read from
    /// * `buf` - Buffer to read into
    fn read_memory(&mut self, addr: u32, buf: &mut [u8]) -> Result<()>;

    /// Write a buffer to target memory
    ///
    /// # Arguments
    /// * `addr` - Starting address to write to
    /// * `data` - Data to write
    fn write_memory(&mut self, addr: u32, data: &[u8]) -> Result<()>;

    /// Read a single little-endian 32-bit word
    fn read_u32(&mut self, addr: u32) -> Result<u32> {
        let mut buf = [0u8; 4];
        self.read_memory(addr, &mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    /// Write a single little-endian 32-bit word
    fn write_u32(&mut self, addr: u32, value: u32) -> Result<()> {
        self.write_memory(addr, &value.to_le_bytes())
    }

    /// Reserve a working area of at least `size` bytes in target RAM
    fn alloc_working_area(&mut self, size: u32) -> Result<WorkingArea>;

    /// Release a working area previously returned by `alloc_working_area`
    fn free_working_area(&mut self, area: WorkingArea);

    /// Start executing code at `entry` without waiting for it to return
    fn start_algorithm(&mut self, entry: u32, ctx: &ExecutionContext) -> Result<()>;

    /// Wait until the algorithm started with `ctx` has stopped
    ///
    /// Returns `Error::AlgorithmTimeout` if the core is still running after
    /// `timeout_ms` milliseconds.
    fn wait_algorithm(&mut self, ctx: &ExecutionContext, timeout_ms: u32) -> Result<()>;

    /// Monotonic time in milliseconds
    fn now_ms(&mut self) -> u64;

    /// Signal the controlling process that a long operation is still alive
    fn keep_alive(&mut self) {}
}

// Blanket impl for boxed targets to allow trait objects
impl DebugTarget for alloc::boxed::Box<dyn DebugTarget + Send> {
    fn is_halted(&self) -> bool {
        (**self).is_halted()
    }

    fn halt(&mut self) -> Result<()> {
        (**self).halt()
    }

    fn read_memory(&mut self, addr: u32, buf: &mut [u8]) -> Result<()> {
        (**self).read_memory(addr, buf)
    }

    fn write_memory(&mut self, addr: u32, data: &[u8]) -> Result<()> {
        (**self).write_memory(addr, data)
    }

    fn read_u32(&mut self, addr: u32) -> Result<u32> {
        (**self).read_u32(addr)
    }

    fn write_u32(&mut self, addr: u32, value: u32) -> Result<()> {
        (**self).write_u32(addr, value)
    }

    fn alloc_working_area(&mut self, size: u32) -> Result<WorkingArea> {
        (**self).alloc_working_area(size)
    }

    fn free_working_area(&mut self, area: WorkingArea) {
        (**self).free_working_area(area)
    }

    fn start_algorithm(&mut self, entry: u32, ctx: &ExecutionContext) -> Result<()> {
        (**self).start_algorithm(entry, ctx)
    }

    fn wait_algorithm(&mut self, ctx: &ExecutionContext, timeout_ms: u32) -> Result<()> {
        (**self).wait_algorithm(ctx, timeout_ms)
    }

    fn now_ms(&mut self) -> u64 {
        (**self).now_ms()
    }

    fn keep_alive(&mut self) {
        (**self).keep_alive()
    }
}

/// Require the target to be halted, logging the failure like every
/// mutating entry point does
pub fn require_halted<T: DebugTarget + ?Sized>(target: &T) -> Result<()> {
    if target.is_halted() {
        Ok(())
    } else {
        log::error!("Target not halted");
        Err(Error::TargetNotHalted)
    }
}
