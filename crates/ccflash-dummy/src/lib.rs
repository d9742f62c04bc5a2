//! ccflash-dummy - In-memory CC26xx/CC13xx target emulator for testing
//!
//! This crate provides a simulated debug target with flash, SRAM, the
//! identification registers and an emulated flash helper algorithm. It's
//! useful for testing and development without real hardware.

mod algorithm;

#[cfg(test)]
mod tests;

use ccflash_core::algo::{layout_for, AlgoLayout, ALGO_BASE_ADDRESS};
use ccflash_core::device::ids::{
    CC13X0_ICEPICK_ID, CC13X2_CC26X2_ICEPICK_ID, CC26X0_ICEPICK_ID, CC26X1_ICEPICK_ID,
    FCFG1_ICEPICK_ID, FCFG1_USER_ID, FLASH_SIZE_INFO, SRAM_SIZE_INFO, USER_ID_CC13_MASK,
};
use ccflash_core::device::{self, DeviceType, Family};
use ccflash_core::error::{Error, Result};
use ccflash_core::target::{DebugTarget, ExecutionContext, WorkingArea};

pub use algorithm::IssuedCommand;
use algorithm::Algorithm;

/// Start of the simulated SRAM
pub const SRAM_BASE: u32 = 0x2000_0000;

/// Configuration for the simulated target
#[derive(Debug, Clone)]
pub struct DummyConfig {
    /// FCFG1 ICEPick id register value
    pub icepick_id: u32,
    /// FCFG1 user id register value
    pub user_id: u32,
    /// SRAM size code reported by the SRAM size info register
    pub sram_size_code: u32,
    /// Raw flash size info register value; the low byte is the sector count
    pub flash_size_info: u32,
    /// Bytes of simulated SRAM
    pub sram_bytes: usize,
    /// Address working areas are granted at
    pub working_area_address: u32,
    /// Status polls a command stays pending before the algorithm completes it
    pub algorithm_latency: u32,
    /// Milliseconds the clock advances on every clock read
    pub tick_ms: u64,
}

impl Default for DummyConfig {
    fn default() -> Self {
        Self::for_device(DeviceType::Cc26x0)
    }
}

impl DummyConfig {
    /// Configuration of a typical device of the given type
    ///
    /// `NoType` gives a device with an unknown ICEPick id.
    pub fn for_device(device_type: DeviceType) -> Self {
        let (icepick_id, user_id, sectors) = match device_type {
            DeviceType::Cc26x0 => (0x2000_0000 | CC26X0_ICEPICK_ID, 0, 32),
            DeviceType::Cc26x1 => (0x2000_0000 | CC26X1_ICEPICK_ID, 0, 32),
            DeviceType::Cc13x0 => (0x2000_0000 | CC13X0_ICEPICK_ID, 0, 32),
            DeviceType::Cc26x2 => (CC13X2_CC26X2_ICEPICK_ID, 0, 44),
            DeviceType::Cc13x2 => (CC13X2_CC26X2_ICEPICK_ID, USER_ID_CC13_MASK, 44),
            DeviceType::NoType => (0x0000_1234, 0, 8),
        };
        Self {
            icepick_id,
            user_id,
            sram_size_code: 3,
            flash_size_info: sectors,
            sram_bytes: 0x1_4000,
            working_area_address: ALGO_BASE_ADDRESS,
            algorithm_latency: 2,
            tick_ms: 1,
        }
    }

    /// Set the number of flash sectors
    pub fn with_sectors(mut self, sectors: u32) -> Self {
        self.flash_size_info = (self.flash_size_info & !0xFF) | (sectors & 0xFF);
        self
    }

    /// Set the silicon revision field of the ICEPick id
    pub fn with_revision(mut self, revision: u32) -> Self {
        self.icepick_id = (self.icepick_id & 0x0FFF_FFFF) | ((revision & 0xF) << 28);
        self
    }

    /// Sector length the device reports
    pub fn sector_length(&self) -> u32 {
        device::sector_length(self.icepick_id)
    }

    /// Size of the simulated flash in bytes
    pub fn flash_size(&self) -> usize {
        (self.flash_size_info & 0xFF) as usize * self.sector_length() as usize
    }

    /// Family of the configured device
    pub fn family(&self) -> Family {
        Family::from_icepick_id(self.icepick_id)
    }
}

/// Injected failures
#[derive(Debug, Clone, Default)]
pub struct Faults {
    /// Core is running and refuses to report halted
    pub not_halted: bool,
    /// `halt` fails
    pub halt_fails: bool,
    /// Working area reservations fail
    pub alloc_fails: bool,
    /// Fail the N-th memory write (1-based, counted from now)
    pub fail_write_nth: Option<usize>,
    /// Fail reads of this address
    pub fail_read_at: Option<u32>,
    /// `start_algorithm` fails
    pub start_fails: bool,
    /// The algorithm never completes commands
    pub stall_algorithm: bool,
    /// Status value the algorithm writes on completion instead of EMPTY
    pub corrupt_status: Option<u32>,
    /// `wait_algorithm` fails
    pub wait_fails: bool,
}

/// Counters of what the host did to the target
#[derive(Debug, Clone, Default)]
pub struct Stats {
    /// Halt requests
    pub halts: usize,
    /// Keep-alive signals
    pub keep_alives: usize,
    /// Granted working area reservations
    pub allocations: usize,
    /// Released working areas
    pub releases: usize,
    /// Algorithm starts
    pub algorithm_starts: usize,
    /// Algorithm waits
    pub algorithm_waits: usize,
    /// Memory writes
    pub memory_writes: usize,
    /// Commands issued to the algorithm, in issue order
    pub commands: Vec<IssuedCommand>,
    /// Writes to a slot whose status was still full
    pub protocol_violations: usize,
}

/// Simulated CC26xx/CC13xx debug target
pub struct DummyTarget {
    config: DummyConfig,
    flash: Vec<u8>,
    sram: Vec<u8>,
    halted: bool,
    now: u64,
    working_area: Option<WorkingArea>,
    algorithm: Option<Algorithm>,
    writes_since_faults: usize,
    faults: Faults,
    stats: Stats,
}

impl DummyTarget {
    /// Create a halted target with erased flash
    pub fn new(config: DummyConfig) -> Self {
        let flash = vec![0xFF; config.flash_size()];
        let sram = vec![0; config.sram_bytes];
        Self {
            config,
            flash,
            sram,
            halted: true,
            now: 0,
            working_area: None,
            algorithm: None,
            writes_since_faults: 0,
            faults: Faults::default(),
            stats: Stats::default(),
        }
    }

    /// Create a target for a device type with default settings
    pub fn for_device(device_type: DeviceType) -> Self {
        Self::new(DummyConfig::for_device(device_type))
    }

    /// Configuration
    pub fn config(&self) -> &DummyConfig {
        &self.config
    }

    /// Flash contents
    pub fn flash(&self) -> &[u8] {
        &self.flash
    }

    /// Mutable flash contents
    pub fn flash_mut(&mut self) -> &mut [u8] {
        &mut self.flash
    }

    /// Counters
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Currently injected failures
    pub fn faults(&self) -> &Faults {
        &self.faults
    }

    /// Replace the injected failures and restart the write counter
    pub fn set_faults(&mut self, faults: Faults) {
        self.faults = faults;
        self.writes_since_faults = 0;
    }

    /// Currently reserved working area
    pub fn working_area(&self) -> Option<WorkingArea> {
        self.working_area
    }

    /// Whether the emulated algorithm is running
    pub fn algorithm_running(&self) -> bool {
        self.algorithm.is_some()
    }

    /// Let the core run
    pub fn resume(&mut self) {
        self.halted = false;
    }

    /// Advance the clock
    pub fn advance(&mut self, ms: u64) {
        self.now += ms;
    }

    fn layout(&self) -> &'static AlgoLayout {
        layout_for(self.config.family())
    }

    fn register(&self, addr: u32) -> Option<u32> {
        match addr {
            FCFG1_ICEPICK_ID => Some(self.config.icepick_id),
            FCFG1_USER_ID => Some(self.config.user_id),
            SRAM_SIZE_INFO => Some(self.config.sram_size_code),
            FLASH_SIZE_INFO => Some(self.config.flash_size_info),
            _ => None,
        }
    }

    fn sram_range(&self, addr: u32, len: usize) -> Option<core::ops::Range<usize>> {
        let start = addr.checked_sub(SRAM_BASE)? as usize;
        let end = start.checked_add(len)?;
        (end <= self.sram.len()).then_some(start..end)
    }

    fn flash_range(&self, addr: u32, len: usize) -> Option<core::ops::Range<usize>> {
        let start = addr as usize;
        let end = start.checked_add(len)?;
        (end <= self.flash.len()).then_some(start..end)
    }

    pub(crate) fn sram_word(&self, addr: u32) -> u32 {
        match self.sram_range(addr, 4) {
            Some(r) => u32::from_le_bytes([
                self.sram[r.start],
                self.sram[r.start + 1],
                self.sram[r.start + 2],
                self.sram[r.start + 3],
            ]),
            None => 0,
        }
    }

    pub(crate) fn set_sram_word(&mut self, addr: u32, value: u32) {
        if let Some(r) = self.sram_range(addr, 4) {
            self.sram[r].copy_from_slice(&value.to_le_bytes());
        }
    }

    pub(crate) fn sram_slice(&self, addr: u32, len: usize) -> Option<&[u8]> {
        self.sram_range(addr, len).map(|r| &self.sram[r])
    }
}

impl DebugTarget for DummyTarget {
    fn is_halted(&self) -> bool {
        self.halted && !self.faults.not_halted
    }

    fn halt(&mut self) -> Result<()> {
        self.stats.halts += 1;
        if self.faults.halt_fails {
            return Err(Error::HaltFailed);
        }
        if self.algorithm.take().is_some() {
            log::debug!("dummy: algorithm halted");
        }
        self.halted = true;
        Ok(())
    }

    fn read_memory(&mut self, addr: u32, buf: &mut [u8]) -> Result<()> {
        if self.faults.fail_read_at == Some(addr) {
            return Err(Error::TargetRead { addr });
        }

        if let Some(value) = self.register(addr) {
            let bytes = value.to_le_bytes();
            let n = buf.len().min(4);
            buf[..n].copy_from_slice(&bytes[..n]);
            return Ok(());
        }

        if buf.len() == 4 {
            self.poll_algorithm(addr);
        }

        if let Some(r) = self.sram_range(addr, buf.len()) {
            buf.copy_from_slice(&self.sram[r]);
            Ok(())
        } else if let Some(r) = self.flash_range(addr, buf.len()) {
            buf.copy_from_slice(&self.flash[r]);
            Ok(())
        } else {
            Err(Error::TargetRead { addr })
        }
    }

    fn write_memory(&mut self, addr: u32, data: &[u8]) -> Result<()> {
        self.stats.memory_writes += 1;
        self.writes_since_faults += 1;

        if self.faults.fail_write_nth == Some(self.writes_since_faults) {
            return Err(Error::TargetWrite { addr });
        }

        let Some(range) = self.sram_range(addr, data.len()) else {
            // Flash and registers are not writable through the bus
            return Err(Error::TargetWrite { addr });
        };

        self.check_slot_write(addr, data.len());
        self.sram[range].copy_from_slice(data);
        self.on_params_written(addr, data.len());
        Ok(())
    }

    fn alloc_working_area(&mut self, size: u32) -> Result<WorkingArea> {
        if self.faults.alloc_fails || self.working_area.is_some() {
            return Err(Error::WorkingAreaUnavailable);
        }
        if self.sram_range(self.config.working_area_address, size as usize).is_none() {
            return Err(Error::WorkingAreaUnavailable);
        }

        let area = WorkingArea {
            address: self.config.working_area_address,
            size,
        };
        self.working_area = Some(area);
        self.stats.allocations += 1;
        Ok(area)
    }

    fn free_working_area(&mut self, area: WorkingArea) {
        if self.working_area == Some(area) {
            self.working_area = None;
            self.stats.releases += 1;
        } else {
            log::warn!("dummy: release of unknown working area {:?}", area);
        }
    }

    fn start_algorithm(&mut self, entry: u32, _ctx: &ExecutionContext) -> Result<()> {
        if self.faults.start_fails {
            return Err(Error::AlgorithmStart);
        }
        let in_area = self
            .working_area
            .is_some_and(|a| entry >= a.address && entry - a.address < a.size);
        if !in_area || entry != ALGO_BASE_ADDRESS {
            return Err(Error::AlgorithmStart);
        }

        self.stats.algorithm_starts += 1;
        self.start_emulation();
        self.halted = false;
        Ok(())
    }

    fn wait_algorithm(&mut self, _ctx: &ExecutionContext, _timeout_ms: u32) -> Result<()> {
        self.stats.algorithm_waits += 1;
        if self.faults.wait_fails || !self.halted {
            return Err(Error::AlgorithmTimeout);
        }
        Ok(())
    }

    fn now_ms(&mut self) -> u64 {
        self.now += self.config.tick_ms;
        self.now
    }

    fn keep_alive(&mut self) {
        self.stats.keep_alives += 1;
    }
}
