//! Probe and info command implementations

use super::Bank;

/// Identify the device and print a summary
pub fn cmd_probe(bank: &mut Bank) -> Result<(), Box<dyn std::error::Error>> {
    bank.probe()?;

    let identity = bank.identity();
    let family = bank
        .profile()
        .map(|p| p.family.name())
        .unwrap_or("unknown");
    println!(
        "Found: {} (revision {}, {} family)",
        identity.device_type,
        identity.revision(),
        family
    );
    println!(
        "Flash: {} sectors of {} bytes ({} bytes) at 0x{:08X}",
        bank.sectors().len(),
        bank.sector_length(),
        bank.size(),
        bank.base()
    );
    Ok(())
}

/// Print the bank description and sector list
pub fn cmd_info(bank: &mut Bank) -> Result<(), Box<dyn std::error::Error>> {
    bank.auto_probe()?;

    let config = bank.config();
    println!("Bank: {} ({}), bank number {}", config.name, config.driver, config.bank_number);
    println!("{}", bank.info_string());

    match bank.profile().and_then(|p| p.image.as_ref()) {
        Some(image) => println!("Flash helper algorithm: {} bytes", image.len()),
        None => println!("Flash helper algorithm: not loaded"),
    }

    println!();
    println!("{:>6}  {:>10}  {:>8}  {}", "Sector", "Offset", "Size", "State");
    for (i, sector) in bank.sectors().iter().enumerate() {
        println!(
            "{:>6}  0x{:08X}  {:>8}  {:?}",
            i, sector.offset, sector.size, sector.erased
        );
    }
    Ok(())
}

#[cfg(all(test, feature = "dummy"))]
mod tests {
    use super::*;
    use crate::commands::tests::dummy_bank;
    use ccflash_core::DeviceType;

    #[test]
    fn test_probe_and_info() {
        let mut bank = dummy_bank("dummy:device=cc13x2,sectors=8");
        cmd_probe(&mut bank).unwrap();
        assert_eq!(bank.identity().device_type, DeviceType::Cc13x2);
        assert_eq!(bank.sectors().len(), 8);
        cmd_info(&mut bank).unwrap();
    }
}
