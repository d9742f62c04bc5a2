//! Blank check command implementation

use super::Bank;
use ccflash_core::{EraseState, FlashDriver};

/// Read every sector back and report which are erased
pub fn cmd_blank_check(bank: &mut Bank) -> Result<(), Box<dyn std::error::Error>> {
    bank.erase_check()?;

    let mut erased = 0;
    for (i, sector) in bank.sectors().iter().enumerate() {
        let state = match sector.erased {
            EraseState::Erased => {
                erased += 1;
                "erased"
            }
            EraseState::Dirty => "programmed",
            EraseState::Unknown => "unknown",
        };
        log::debug!("sector {} at 0x{:08X}: {}", i, sector.offset, state);
    }

    println!(
        "{} of {} sectors erased",
        erased,
        bank.sectors().len()
    );
    Ok(())
}
