//! Erase command implementation

use super::progress::IndicatifProgress;
use super::Bank;

/// Erase the sector range `first..=last`, or the whole bank
pub fn cmd_erase(
    bank: &mut Bank,
    range: Option<(usize, usize)>,
) -> Result<(), Box<dyn std::error::Error>> {
    bank.auto_probe()?;

    let mut progress = IndicatifProgress::new();
    match range {
        Some((first, last)) => {
            log::info!("Erasing sectors {}..={}", first, last);
            bank.erase_sectors(first, last, &mut progress)?;
            println!("Erased sectors {} to {}", first, last);
        }
        None => {
            log::info!("Erasing {} bytes of flash", bank.size());
            bank.mass_erase(&mut progress)?;
            println!("Erased {} sectors", bank.sectors().len());
        }
    }
    Ok(())
}

#[cfg(all(test, feature = "dummy"))]
mod tests {
    use super::*;
    use crate::commands::tests::dummy_bank;
    use ccflash_core::{EraseState, FlashDriver};

    #[test]
    fn test_erase_range() {
        let mut bank = dummy_bank("dummy:sectors=8");
        cmd_erase(&mut bank, Some((2, 3))).unwrap();

        let states: Vec<EraseState> = bank.sectors().iter().map(|s| s.erased).collect();
        assert_eq!(states[2], EraseState::Erased);
        assert_eq!(states[3], EraseState::Erased);
        assert_eq!(states[0], EraseState::Unknown);

        let mut buf = vec![0u8; 0x2000];
        bank.read(0x2000, &mut buf).unwrap();
        assert!(buf.iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn test_erase_out_of_range() {
        let mut bank = dummy_bank("dummy:sectors=8");
        assert!(cmd_erase(&mut bank, Some((4, 8))).is_err());
    }

    #[test]
    fn test_mass_erase() {
        let mut bank = dummy_bank("dummy:device=cc26x2,sectors=4");
        cmd_erase(&mut bank, None).unwrap();
        assert!(bank
            .sectors()
            .iter()
            .all(|s| s.erased == EraseState::Erased));
    }
}
