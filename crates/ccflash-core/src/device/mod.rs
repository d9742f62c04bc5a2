//! Device variant resolution
//!
//! Turns the raw identification register values read from the target into
//! a device type, SRAM size, sector length and family. Everything in here
//! is pure; the registers are read by the bank probe.

pub mod ids;
mod types;

pub use types::*;

use ids::*;

/// Sector length of Chameleon family devices
pub const CHAMELEON_SECTOR_LENGTH: u32 = 0x1000;
/// Sector length of Agama family devices
pub const AGAMA_SECTOR_LENGTH: u32 = 0x2000;

/// SRAM sizes of first-generation (PG1) Chameleon silicon, by size code
pub const CHAMELEON_PG1_SRAM: [u32; 4] = [0x800, 0x1000, 0x2000, 0x4000];
/// SRAM sizes of PG2 and later Chameleon silicon, by size code
pub const CHAMELEON_PG2_SRAM: [u32; 4] = [0x1000, 0x2800, 0x4000, 0x5000];
/// SRAM sizes of Agama devices, by size code
pub const AGAMA_SRAM: [u32; 4] = [0x8000, 0xC000, 0x1_0000, 0x1_4000];

/// Everything the identification registers tell us about a device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Variant {
    /// Raw ids and resolved type
    pub identity: DeviceIdentity,
    /// Family selecting geometry and algorithm layout
    pub family: Family,
    /// Available SRAM in bytes
    pub sram_size: u32,
    /// Flash sector length in bytes
    pub sector_length: u32,
}

/// Resolve the device type from the ICEPick id and user id
pub fn device_type(icepick_id: u32, user_id: u32) -> DeviceType {
    match icepick_id & ICEPICK_ID_MASK {
        CC26X0_ICEPICK_ID => DeviceType::Cc26x0,
        CC26X1_ICEPICK_ID => DeviceType::Cc26x1,
        CC13X0_ICEPICK_ID => DeviceType::Cc13x0,
        // CC13X2_CC26X2_ICEPICK_ID and anything unrecognised
        _ => {
            if user_id & USER_ID_CC13_MASK != 0 {
                DeviceType::Cc13x2
            } else {
                DeviceType::Cc26x2
            }
        }
    }
}

/// SRAM size table applying to a given ICEPick id
///
/// Chameleon parts pick between the PG1 and PG2 tables by silicon
/// revision. Only revisions 0 and 1 are PG1; every other revision value
/// is treated as PG2 or later.
pub fn sram_table(icepick_id: u32) -> &'static [u32; 4] {
    match Family::from_icepick_id(icepick_id) {
        Family::Chameleon => {
            if CHAMELEON_PG1_REVISIONS.contains(&(icepick_id & ICEPICK_REV_MASK)) {
                &CHAMELEON_PG1_SRAM
            } else {
                &CHAMELEON_PG2_SRAM
            }
        }
        Family::Agama => &AGAMA_SRAM,
    }
}

/// Resolve the SRAM size from the ICEPick id and the SRAM size code
///
/// Codes outside 0..=2 select the largest entry of the table.
pub fn sram_size(icepick_id: u32, size_code: u32) -> u32 {
    let table = sram_table(icepick_id);
    match size_code {
        0..=2 => table[size_code as usize],
        _ => table[3],
    }
}

/// Resolve the flash sector length from the ICEPick id
pub fn sector_length(icepick_id: u32) -> u32 {
    match Family::from_icepick_id(icepick_id) {
        Family::Chameleon => CHAMELEON_SECTOR_LENGTH,
        Family::Agama => AGAMA_SECTOR_LENGTH,
    }
}

/// Resolve everything at once
pub fn resolve(icepick_id: u32, user_id: u32, size_code: u32) -> Variant {
    Variant {
        identity: DeviceIdentity::new(icepick_id, user_id),
        family: Family::from_icepick_id(icepick_id),
        sram_size: sram_size(icepick_id, size_code),
        sector_length: sector_length(icepick_id),
    }
}
