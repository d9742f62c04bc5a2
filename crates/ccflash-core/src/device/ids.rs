//! Identification register addresses and id values

/// FCFG1 register holding the ICEPick device id
pub const FCFG1_ICEPICK_ID: u32 = 0x5000_1318;
/// FCFG1 register holding the user id
pub const FCFG1_USER_ID: u32 = 0x5000_1294;

/// Register whose low byte holds the number of flash sectors
pub const FLASH_SIZE_INFO: u32 = 0x4003_002C;
/// Register holding the SRAM size code
pub const SRAM_SIZE_INFO: u32 = 0x4008_2250;

/// Mask selecting the chip id field of the ICEPick id
pub const ICEPICK_ID_MASK: u32 = 0x0FFF_FFFF;
/// Mask selecting the silicon revision field of the ICEPick id
pub const ICEPICK_REV_MASK: u32 = 0xF000_0000;

/// ICEPick id of CC26x0 devices
pub const CC26X0_ICEPICK_ID: u32 = 0x0B99_A02F;
/// ICEPick id of CC26x1 devices
pub const CC26X1_ICEPICK_ID: u32 = 0x0B9B_D02F;
/// ICEPick id of CC13x0 devices
pub const CC13X0_ICEPICK_ID: u32 = 0x0B9B_E02F;
/// ICEPick id shared by CC13x2 and CC26x2 devices
pub const CC13X2_CC26X2_ICEPICK_ID: u32 = 0x0BB4_102F;

/// User id bit set on CC13x2 (sub-GHz capable) parts
pub const USER_ID_CC13_MASK: u32 = 0x0080_0000;

/// Revision values of first-generation (PG1) Chameleon silicon
pub const CHAMELEON_PG1_REVISIONS: [u32; 2] = [0x0000_0000, 0x1000_0000];

/// Start of the flash bank in the target address space
pub const FLASH_BASE_ADDR: u32 = 0x0000_0000;

/// Maximum number of sectors tracked per bank
pub const MAX_SECTOR_COUNT: usize = 128;
