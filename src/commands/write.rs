//! Write command implementation

use super::progress::IndicatifProgress;
use super::Bank;
use std::path::Path;

/// Program a file into the bank at `offset`
///
/// Unless `no_erase` is set, every sector the image touches is erased
/// first.
pub fn cmd_write(
    bank: &mut Bank,
    input: &Path,
    offset: u32,
    no_erase: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = std::fs::read(input)?;
    log::info!("Read {} bytes from {}", data.len(), input.display());

    bank.auto_probe()?;

    if data.is_empty() {
        println!("Input file is empty, nothing to write");
        return Ok(());
    }

    let end = u32::try_from(data.len())
        .ok()
        .and_then(|len| offset.checked_add(len))
        .filter(|&end| end <= bank.size())
        .ok_or_else(|| {
            format!(
                "Image of {} bytes at offset 0x{:X} does not fit the {} byte bank",
                data.len(),
                offset,
                bank.size()
            )
        })?;

    let mut progress = IndicatifProgress::new();

    if !no_erase {
        let sector_length = bank.sector_length();
        let first = (offset / sector_length) as usize;
        let last = ((end - 1) / sector_length) as usize;
        bank.erase_sectors(first, last, &mut progress)?;
    }

    bank.program(offset, &data, &mut progress)?;

    println!(
        "Wrote {} bytes at 0x{:08X}",
        data.len(),
        bank.base() + offset
    );
    Ok(())
}

#[cfg(all(test, feature = "dummy"))]
mod tests {
    use super::*;
    use crate::commands::tests::{dummy_bank, scratch_path};
    use ccflash_core::FlashDriver;

    #[test]
    fn test_write_file() {
        let path = scratch_path("write.bin");
        let image: Vec<u8> = (0..0x1800u32).map(|i| (i % 251) as u8).collect();
        std::fs::write(&path, &image).unwrap();

        let mut bank = dummy_bank("dummy:sectors=8");
        cmd_write(&mut bank, &path, 0x1000, false).unwrap();

        let mut buf = vec![0u8; image.len()];
        bank.read(0x1000, &mut buf).unwrap();
        assert_eq!(buf, image);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_too_large() {
        let path = scratch_path("large.bin");
        std::fs::write(&path, vec![0u8; 0x2000]).unwrap();

        let mut bank = dummy_bank("dummy:sectors=2");
        assert!(cmd_write(&mut bank, &path, 0x1000, false).is_err());

        std::fs::remove_file(&path).unwrap();
    }
}
