//! CC26xx/CC13xx flash bank
//!
//! [`Cc26xxBank`] owns the debug target and everything learned about the
//! device: its identity, the selected [`FamilyProfile`], the sector list and
//! the helper algorithm's working area while it is running.

mod config;
mod info;
mod sector;

pub use config::*;
pub use sector::{EraseState, Sector};

use crate::algo::{AlgorithmImages, FamilyProfile};
use crate::device::ids::{
    FCFG1_ICEPICK_ID, FCFG1_USER_ID, FLASH_BASE_ADDR, FLASH_SIZE_INFO, MAX_SECTOR_COUNT,
    SRAM_SIZE_INFO,
};
use crate::device::{self, DeviceIdentity, CHAMELEON_SECTOR_LENGTH};
use crate::error::{Error, Result};
use crate::target::{require_halted, DebugTarget, ExecutionContext, WorkingArea};

/// Sector list of a bank
pub type Sectors = heapless::Vec<Sector, MAX_SECTOR_COUNT>;

/// A CC26xx/CC13xx main flash bank
pub struct Cc26xxBank<T: DebugTarget> {
    pub(crate) target: T,
    pub(crate) config: BankConfig,
    pub(crate) images: AlgorithmImages,
    pub(crate) identity: DeviceIdentity,
    pub(crate) profile: Option<FamilyProfile>,
    pub(crate) sram_size: u32,
    pub(crate) sector_length: u32,
    pub(crate) probed: bool,
    pub(crate) working_area: Option<WorkingArea>,
    pub(crate) exec_ctx: ExecutionContext,
    pub(crate) sectors: Sectors,
    pub(crate) base: u32,
    pub(crate) size: u32,
}

impl<T: DebugTarget> Cc26xxBank<T> {
    /// Create an unprobed bank
    pub fn new(target: T, config: BankConfig, images: AlgorithmImages) -> Self {
        let base = config.base;
        let size = config.size;
        Self {
            target,
            config,
            images,
            identity: DeviceIdentity::default(),
            profile: None,
            sram_size: 0,
            sector_length: CHAMELEON_SECTOR_LENGTH,
            probed: false,
            working_area: None,
            exec_ctx: ExecutionContext::default(),
            sectors: Sectors::new(),
            base,
            size,
        }
    }

    /// Identify the device and build the sector list
    ///
    /// Reads the identification and size registers, resolves the variant
    /// and selects the family profile. Probing again replaces everything
    /// learned by an earlier probe.
    pub fn probe(&mut self) -> Result<()> {
        require_halted(&self.target)?;

        let icepick_id = self.target.read_u32(FCFG1_ICEPICK_ID)?;
        let user_id = self.target.read_u32(FCFG1_USER_ID)?;
        let size_code = self.target.read_u32(SRAM_SIZE_INFO)?;
        let flash_info = self.target.read_u32(FLASH_SIZE_INFO)?;

        let variant = device::resolve(icepick_id, user_id, size_code);
        let profile = FamilyProfile::select(icepick_id, &self.images);

        let count = ((flash_info & 0xFF) as usize).min(MAX_SECTOR_COUNT);
        let mut sectors = Sectors::new();
        for i in 0..count {
            // count is clamped to the capacity
            let _ = sectors.push(Sector::new(i as u32 * variant.sector_length, variant.sector_length));
        }

        if profile.image.is_none() {
            log::warn!("No {} flash helper algorithm image loaded", profile.family);
        }

        self.identity = variant.identity;
        self.sram_size = variant.sram_size;
        self.sector_length = variant.sector_length;
        self.profile = Some(profile);
        self.sectors = sectors;
        self.base = FLASH_BASE_ADDR;
        self.size = count as u32 * variant.sector_length;
        self.probed = true;

        log::info!(
            "{} device (rev {}): {} sectors of 0x{:x} bytes, SRAM 0x{:x}",
            self.identity.device_type,
            self.identity.revision(),
            count,
            self.sector_length,
            self.sram_size
        );

        Ok(())
    }

    /// Probe unless already probed
    pub fn auto_probe(&mut self) -> Result<()> {
        if self.config.bank_number != 0 {
            return Err(Error::InvalidBank);
        }
        if !self.probed {
            self.probe()?;
        }
        Ok(())
    }

    /// Whether the bank has been probed
    pub fn is_probed(&self) -> bool {
        self.probed
    }

    /// Bank configuration
    pub fn config(&self) -> &BankConfig {
        &self.config
    }

    /// Device identity (default until probed)
    pub fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }

    /// Selected family profile
    pub fn profile(&self) -> Option<&FamilyProfile> {
        self.profile.as_ref()
    }

    /// Sector list
    pub fn sectors(&self) -> &[Sector] {
        &self.sectors
    }

    /// SRAM size in bytes
    pub fn sram_size(&self) -> u32 {
        self.sram_size
    }

    /// Sector length in bytes
    pub fn sector_length(&self) -> u32 {
        self.sector_length
    }

    /// Base address of the bank
    pub fn base(&self) -> u32 {
        self.base
    }

    /// Size of the bank in bytes
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Working area held by a running algorithm
    pub fn working_area(&self) -> Option<WorkingArea> {
        self.working_area
    }

    /// Underlying target
    pub fn target(&self) -> &T {
        &self.target
    }

    /// Underlying target
    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    /// Give the target back
    pub fn into_target(self) -> T {
        self.target
    }

    pub(crate) fn require_probed(&self) -> Result<&FamilyProfile> {
        match &self.profile {
            Some(profile) if self.probed => Ok(profile),
            _ => Err(Error::NotProbed),
        }
    }

    pub(crate) fn mark_sectors(&mut self, first: usize, last: usize, state: EraseState) {
        for sector in self.sectors.iter_mut().take(last + 1).skip(first) {
            sector.erased = state;
        }
    }

    pub(crate) fn mark_all(&mut self, state: EraseState) {
        for sector in self.sectors.iter_mut() {
            sector.erased = state;
        }
    }
}
