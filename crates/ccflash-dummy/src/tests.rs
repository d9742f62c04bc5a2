use ccflash_core::algo::{Command, Slot};
use ccflash_core::device::ids::{FCFG1_USER_ID, MAX_SECTOR_COUNT};
use ccflash_core::{
    AlgorithmImages, BankConfig, Cc26xxBank, DeviceType, EraseState, Error, Family, FlashDriver,
    NoProgress, Progress, WorkingArea,
};

use super::*;

fn images() -> AlgorithmImages {
    AlgorithmImages::new()
        .with_image(Family::Chameleon, vec![0xA5; 0x400])
        .with_image(Family::Agama, vec![0x5A; 0x800])
}

fn bank_with(target: DummyTarget) -> Cc26xxBank<DummyTarget> {
    Cc26xxBank::new(target, BankConfig::default(), images())
}

fn bank(device_type: DeviceType) -> Cc26xxBank<DummyTarget> {
    bank_with(DummyTarget::for_device(device_type))
}

fn states(bank: &Cc26xxBank<DummyTarget>) -> Vec<EraseState> {
    bank.sectors().iter().map(|s| s.erased).collect()
}

fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 7 + 3) as u8).collect()
}

/// Checks that every teardown matched a start
fn assert_torn_down(target: &DummyTarget) {
    let stats = target.stats();
    assert_eq!(stats.allocations, stats.releases);
    assert_eq!(stats.algorithm_starts, stats.algorithm_waits);
    assert!(target.working_area().is_none());
    assert!(!target.algorithm_running());
}

#[test]
fn test_probe_each_device() {
    for (device_type, family, sectors, sector_length, sram) in [
        (DeviceType::Cc26x0, Family::Chameleon, 32, 0x1000, 0x5000),
        (DeviceType::Cc26x1, Family::Chameleon, 32, 0x1000, 0x5000),
        (DeviceType::Cc13x0, Family::Chameleon, 32, 0x1000, 0x5000),
        (DeviceType::Cc26x2, Family::Agama, 44, 0x2000, 0x1_4000),
        (DeviceType::Cc13x2, Family::Agama, 44, 0x2000, 0x1_4000),
    ] {
        let mut bank = bank(device_type);
        bank.probe().unwrap();

        assert_eq!(bank.identity().device_type, device_type);
        assert_eq!(bank.profile().map(|p| p.family), Some(family));
        assert_eq!(bank.sector_length(), sector_length);
        assert_eq!(bank.sectors().len(), sectors);
        assert_eq!(bank.size(), sectors as u32 * sector_length);
        assert_eq!(bank.base(), 0);
        assert_eq!(bank.sram_size(), sram);
        assert!(bank
            .sectors()
            .iter()
            .enumerate()
            .all(|(i, s)| s.offset == i as u32 * sector_length
                && s.size == sector_length
                && s.erased == EraseState::Unknown
                && !s.protected));
    }
}

#[test]
fn test_probe_pg1_sram_table() {
    let config = DummyConfig::for_device(DeviceType::Cc26x0).with_revision(1);
    let mut bank = bank_with(DummyTarget::new(config));
    bank.probe().unwrap();
    assert_eq!(bank.sram_size(), 0x4000);
    assert_eq!(bank.identity().revision(), 1);
}

#[test]
fn test_probe_unknown_id_is_agama() {
    let mut bank = bank(DeviceType::NoType);
    bank.probe().unwrap();
    assert_eq!(bank.identity().device_type, DeviceType::Cc26x2);
    assert_eq!(bank.sector_length(), 0x2000);
    assert_eq!(bank.sectors().len(), 8);
}

#[test]
fn test_probe_clamps_sector_count() {
    let config = DummyConfig::for_device(DeviceType::Cc26x0).with_sectors(0xFF);
    let mut bank = bank_with(DummyTarget::new(config));
    bank.probe().unwrap();
    assert_eq!(bank.sectors().len(), MAX_SECTOR_COUNT);
    assert_eq!(bank.size(), MAX_SECTOR_COUNT as u32 * 0x1000);
}

#[test]
fn test_probe_requires_halted_target() {
    let mut bank = bank(DeviceType::Cc26x0);
    bank.target_mut().set_faults(Faults {
        not_halted: true,
        ..Default::default()
    });
    assert_eq!(bank.probe(), Err(Error::TargetNotHalted));
    assert!(!bank.is_probed());
}

#[test]
fn test_probe_read_failure() {
    let mut bank = bank(DeviceType::Cc26x0);
    bank.target_mut().set_faults(Faults {
        fail_read_at: Some(FCFG1_USER_ID),
        ..Default::default()
    });
    assert_eq!(
        bank.probe(),
        Err(Error::TargetRead {
            addr: FCFG1_USER_ID
        })
    );
    assert!(!bank.is_probed());
}

#[test]
fn test_info() {
    let mut bank = bank(DeviceType::Cc26x0);
    bank.probe().unwrap();

    let expected = "CC26x0 device: ICEPick ID 0x2b99a02f, USER ID 0x00000000\nflash size = 0x20000, SRAM size = 0x5000";
    assert_eq!(bank.info_string(), expected);

    let mut buf = [0u8; 256];
    let n = bank.info(&mut buf).unwrap();
    assert_eq!(&buf[..n], expected.as_bytes());

    let mut small = [0u8; 16];
    assert_eq!(bank.info(&mut small), Err(Error::BufferTooSmall));
}

#[test]
fn test_info_cc13x2() {
    let mut bank = bank(DeviceType::Cc13x2);
    bank.probe().unwrap();
    assert!(bank
        .info_string()
        .starts_with("CC13x2 device: ICEPick ID 0x0bb4102f, USER ID 0x00800000"));
}

#[test]
fn test_program_read_back() {
    let mut bank = bank(DeviceType::Cc26x0);
    bank.mass_erase(&mut NoProgress).unwrap();

    let data = pattern(0x2345);
    bank.program(0x1800, &data, &mut NoProgress).unwrap();

    let mut buf = vec![0u8; data.len()];
    bank.read(0x1800, &mut buf).unwrap();
    assert_eq!(buf, data);
    // Neighbouring bytes stay erased
    assert_eq!(bank.target().flash()[0x17FF], 0xFF);
    assert_eq!(bank.target().flash()[0x1800 + data.len()], 0xFF);

    let programs: Vec<_> = bank.target().stats().commands[1..]
        .iter()
        .map(|c| (c.slot, c.command, c.address, c.length))
        .collect();
    assert_eq!(
        programs,
        [
            (Slot::First, Some(Command::Program), 0x1800, 0x1000),
            (Slot::Second, Some(Command::Program), 0x2800, 0x1000),
            (Slot::First, Some(Command::Program), 0x3800, 0x345),
        ]
    );

    let mut expected = vec![EraseState::Unknown; 32];
    for state in &mut expected[1..=3] {
        *state = EraseState::Dirty;
    }
    assert_eq!(states(&bank), expected);

    let target = bank.target();
    assert_eq!(target.stats().protocol_violations, 0);
    assert_eq!(target.stats().algorithm_starts, 2);
    assert_eq!(target.stats().halts, 2);
    assert_torn_down(target);
}

#[test]
fn test_program_single_byte_marks_one_sector() {
    let mut bank = bank(DeviceType::Cc26x0);
    bank.probe().unwrap();
    bank.program(0x2FFF, &[0x00], &mut NoProgress).unwrap();

    assert_eq!(bank.sectors()[2].erased, EraseState::Dirty);
    assert_eq!(bank.sectors()[3].erased, EraseState::Unknown);
    assert_eq!(bank.target().flash()[0x2FFF], 0x00);
}

#[test]
fn test_program_exact_sectors() {
    let mut bank = bank(DeviceType::Cc26x0);
    bank.probe().unwrap();
    bank.program(0x1000, &pattern(0x2000), &mut NoProgress).unwrap();

    let dirty: Vec<usize> = states(&bank)
        .iter()
        .enumerate()
        .filter(|(_, s)| **s == EraseState::Dirty)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(dirty, [1, 2]);
}

#[test]
fn test_program_long_write_pipelines_cleanly() {
    let mut config = DummyConfig::for_device(DeviceType::Cc26x2);
    config.algorithm_latency = 5;
    let mut bank = bank_with(DummyTarget::new(config));

    let data = pattern(0x9001);
    bank.program(0, &data, &mut NoProgress).unwrap();

    let target = bank.target();
    assert_eq!(&target.flash()[..data.len()], &data[..]);
    assert_eq!(target.stats().commands.len(), 5);
    assert_eq!(target.stats().protocol_violations, 0);
    assert_torn_down(target);
}

#[test]
fn test_program_sends_keep_alive() {
    let mut config = DummyConfig::for_device(DeviceType::Cc26x0);
    config.tick_ms = 100;
    config.algorithm_latency = 0;
    let mut bank = bank_with(DummyTarget::new(config));

    bank.program(0, &pattern(0x8000), &mut NoProgress).unwrap();
    assert!(bank.target().stats().keep_alives > 0);
}

#[test]
fn test_empty_program_touches_nothing() {
    let mut bank = bank(DeviceType::Cc26x0);
    bank.program(0, &[], &mut NoProgress).unwrap();

    assert!(!bank.is_probed());
    assert_eq!(bank.target().stats().memory_writes, 0);
    assert_eq!(bank.target().stats().allocations, 0);
}

#[test]
fn test_program_out_of_bounds() {
    let mut bank = bank(DeviceType::Cc26x0);
    assert_eq!(
        bank.program(0x1_FFFF, &[0, 0], &mut NoProgress),
        Err(Error::AddressOutOfBounds)
    );
    assert_eq!(
        bank.program(u32::MAX, &[0], &mut NoProgress),
        Err(Error::AddressOutOfBounds)
    );
    assert_eq!(bank.target().stats().allocations, 0);

    let mut buf = [0u8; 2];
    assert_eq!(bank.read(0x1_FFFF, &mut buf), Err(Error::AddressOutOfBounds));
}

#[test]
fn test_mass_erase() {
    let mut bank = bank(DeviceType::Cc26x0);
    bank.target_mut().flash_mut().fill(0x00);

    bank.mass_erase(&mut NoProgress).unwrap();

    let target = bank.target();
    assert!(target.flash().iter().all(|&b| b == 0xFF));
    assert_eq!(target.stats().commands.len(), 1);
    let command = target.stats().commands[0];
    assert_eq!(command.slot, Slot::First);
    assert_eq!(command.command, Some(Command::EraseAll));
    assert_eq!((command.address, command.length), (0, 4));
    assert!(states(&bank).iter().all(|s| *s == EraseState::Erased));
    assert_torn_down(bank.target());
}

#[test]
fn test_erase_sectors_is_idempotent() {
    let mut bank = bank(DeviceType::Cc26x0);
    bank.target_mut().flash_mut()[0x2000..0x6000].fill(0x00);

    bank.erase_sectors(2, 4, &mut NoProgress).unwrap();
    let after_first = bank.target().flash().to_vec();
    bank.erase_sectors(2, 4, &mut NoProgress).unwrap();
    assert_eq!(bank.target().flash(), &after_first[..]);

    let flash = bank.target().flash();
    assert!(flash[0x2000..0x5000].iter().all(|&b| b == 0xFF));
    // Sector 5 was not requested
    assert!(flash[0x5000..0x6000].iter().all(|&b| b == 0x00));

    let erases: Vec<_> = bank.target().stats().commands[..3]
        .iter()
        .map(|c| (c.slot, c.command, c.address, c.length))
        .collect();
    assert_eq!(
        erases,
        [
            (Slot::First, Some(Command::EraseAndProgram), 0x2000, 4),
            (Slot::Second, Some(Command::EraseAndProgram), 0x3000, 4),
            (Slot::First, Some(Command::EraseAndProgram), 0x4000, 4),
        ]
    );

    let mut expected = vec![EraseState::Unknown; 32];
    for state in &mut expected[2..=4] {
        *state = EraseState::Erased;
    }
    assert_eq!(states(&bank), expected);
    assert_eq!(bank.target().stats().protocol_violations, 0);
    assert_torn_down(bank.target());
}

#[test]
fn test_erase_single_sector() {
    let mut bank = bank(DeviceType::Cc13x2);
    bank.target_mut().flash_mut()[0x4000..0x6000].fill(0x12);

    bank.erase_sectors(2, 2, &mut NoProgress).unwrap();

    assert!(bank.target().flash()[0x4000..0x6000]
        .iter()
        .all(|&b| b == 0xFF));
    assert_eq!(bank.target().stats().commands.len(), 1);
    assert_eq!(bank.sectors()[2].erased, EraseState::Erased);
}

#[test]
fn test_full_range_erase_is_mass_erase() {
    let mut bank = bank(DeviceType::Cc26x0);
    bank.erase_sectors(0, 31, &mut NoProgress).unwrap();

    let commands = &bank.target().stats().commands;
    assert_eq!(commands.len(), 1);
    assert_eq!(commands[0].command, Some(Command::EraseAll));
    assert!(states(&bank).iter().all(|s| *s == EraseState::Erased));
}

#[test]
fn test_erase_range_validation() {
    let mut bank = bank(DeviceType::Cc26x0);
    assert_eq!(
        bank.erase_sectors(3, 2, &mut NoProgress),
        Err(Error::SectorOutOfRange)
    );
    assert_eq!(
        bank.erase_sectors(0, 32, &mut NoProgress),
        Err(Error::SectorOutOfRange)
    );
    assert_eq!(bank.target().stats().algorithm_starts, 0);
}

#[test]
fn test_stalled_algorithm_times_out() {
    let mut bank = bank(DeviceType::Cc26x0);
    bank.mass_erase(&mut NoProgress).unwrap();
    bank.target_mut().set_faults(Faults {
        stall_algorithm: true,
        ..Default::default()
    });

    assert_eq!(
        bank.program(0, &pattern(0x100), &mut NoProgress),
        Err(Error::FlashOperationFailed {
            family: Family::Chameleon
        })
    );

    let target = bank.target();
    // Every poll past the threshold kept the session alive
    assert!(target.stats().keep_alives >= 7000);
    // Teardown ran once for each of the two operations
    assert_eq!(target.stats().halts, 2);
    assert_eq!(target.stats().algorithm_waits, 2);
    assert_torn_down(target);
    assert!(!states(&bank).contains(&EraseState::Dirty));
}

#[test]
fn test_corrupt_status_fails_operation() {
    let mut bank = bank(DeviceType::Cc26x2);
    bank.probe().unwrap();
    bank.target_mut().set_faults(Faults {
        corrupt_status: Some(0x1234_5678),
        ..Default::default()
    });

    assert_eq!(
        bank.mass_erase(&mut NoProgress),
        Err(Error::FlashOperationFailed {
            family: Family::Agama
        })
    );
    assert!(states(&bank).iter().all(|s| *s == EraseState::Unknown));
    assert_torn_down(bank.target());
}

#[test]
fn test_buffer_write_failure_cleans_up() {
    let mut bank = bank(DeviceType::Cc26x0);
    bank.probe().unwrap();
    // Write 1 uploads the algorithm, write 2 loads the first chunk
    bank.target_mut().set_faults(Faults {
        fail_write_nth: Some(2),
        ..Default::default()
    });

    assert_eq!(
        bank.program(0, &pattern(0x100), &mut NoProgress),
        Err(Error::TargetWrite { addr: 0x2000_1C00 })
    );

    let target = bank.target();
    assert_eq!(target.stats().halts, 1);
    assert!(target.stats().commands.is_empty());
    assert_torn_down(target);
    assert!(!states(&bank).contains(&EraseState::Dirty));
}

#[test]
fn test_working_area_mismatch() {
    let mut config = DummyConfig::for_device(DeviceType::Cc26x0);
    config.working_area_address = 0x2000_1000;
    let mut bank = bank_with(DummyTarget::new(config));

    assert_eq!(
        bank.mass_erase(&mut NoProgress),
        Err(Error::WorkingAreaMismatch {
            expected: 0x2000_0000,
            actual: 0x2000_1000
        })
    );
    let target = bank.target();
    assert_eq!(target.stats().allocations, 1);
    assert_eq!(target.stats().releases, 1);
    assert_eq!(target.stats().algorithm_starts, 0);
    assert!(target.working_area().is_none());
}

#[test]
fn test_working_area_unavailable() {
    let mut bank = bank(DeviceType::Cc26x0);
    bank.target_mut().set_faults(Faults {
        alloc_fails: true,
        ..Default::default()
    });
    assert_eq!(
        bank.erase_sectors(1, 2, &mut NoProgress),
        Err(Error::WorkingAreaUnavailable)
    );
    assert_eq!(bank.target().stats().algorithm_starts, 0);
}

#[test]
fn test_start_failure_releases_working_area() {
    let mut bank = bank(DeviceType::Cc26x0);
    bank.target_mut().set_faults(Faults {
        start_fails: true,
        ..Default::default()
    });
    assert_eq!(
        bank.mass_erase(&mut NoProgress),
        Err(Error::AlgorithmStart)
    );
    assert_eq!(bank.target().stats().releases, 1);
    assert!(bank.target().working_area().is_none());
}

#[test]
fn test_operations_require_halted_target() {
    let mut bank = bank(DeviceType::Cc26x0);
    bank.probe().unwrap();
    bank.target_mut().set_faults(Faults {
        not_halted: true,
        ..Default::default()
    });

    assert_eq!(bank.mass_erase(&mut NoProgress), Err(Error::TargetNotHalted));
    assert_eq!(
        bank.erase_sectors(1, 1, &mut NoProgress),
        Err(Error::TargetNotHalted)
    );
    assert_eq!(
        bank.program(0, &[0], &mut NoProgress),
        Err(Error::TargetNotHalted)
    );
    assert_eq!(bank.target().stats().allocations, 0);
}

#[test]
fn test_missing_image_for_family() {
    let images = AlgorithmImages::new().with_image(Family::Chameleon, vec![0xA5; 0x100]);
    let mut bank = Cc26xxBank::new(
        DummyTarget::for_device(DeviceType::Cc26x2),
        BankConfig::default(),
        images,
    );

    bank.probe().unwrap();
    assert_eq!(
        bank.mass_erase(&mut NoProgress),
        Err(Error::AlgorithmImageMissing)
    );
    assert_eq!(bank.target().stats().allocations, 0);
}

#[test]
fn test_teardown_failure_keeps_success() {
    let mut bank = bank(DeviceType::Cc26x0);
    bank.target_mut().flash_mut().fill(0x00);
    bank.target_mut().set_faults(Faults {
        halt_fails: true,
        ..Default::default()
    });

    bank.mass_erase(&mut NoProgress).unwrap();

    let target = bank.target();
    assert!(target.flash().iter().all(|&b| b == 0xFF));
    assert_eq!(target.stats().releases, 1);
    assert!(states(&bank).iter().all(|s| *s == EraseState::Erased));
}

#[test]
fn test_other_bank_numbers_rejected() {
    let mut bank = Cc26xxBank::new(
        DummyTarget::for_device(DeviceType::Cc26x0),
        BankConfig::default().with_bank_number(1),
        images(),
    );
    assert_eq!(bank.auto_probe(), Err(Error::InvalidBank));
    assert_eq!(
        bank.mass_erase(&mut NoProgress),
        Err(Error::InvalidBank)
    );
}

#[test]
fn test_erase_check() {
    let mut bank = bank(DeviceType::Cc26x0);
    bank.mass_erase(&mut NoProgress).unwrap();
    bank.program(0x3000, &[0x00; 16], &mut NoProgress).unwrap();

    bank.erase_check().unwrap();
    let states = states(&bank);
    assert_eq!(states[3], EraseState::Dirty);
    assert!(states
        .iter()
        .enumerate()
        .all(|(i, s)| i == 3 || *s == EraseState::Erased));
}

#[test]
fn test_protect_is_noop() {
    let mut bank = bank(DeviceType::Cc26x0);
    bank.probe().unwrap();
    FlashDriver::protect(&mut bank, true, 0, 3).unwrap();
    FlashDriver::protect_check(&mut bank).unwrap();
    assert!(bank.sectors().iter().all(|s| !s.protected));
}

#[test]
fn test_driver_trait_on_boxed_target() {
    let target: Box<dyn DebugTarget + Send> = Box::new(DummyTarget::for_device(DeviceType::Cc13x0));
    let mut bank = Cc26xxBank::new(target, BankConfig::default(), images());

    let driver: &mut dyn FlashDriver = &mut bank;
    driver.erase(0, 31).unwrap();
    driver.write(&[0x11, 0x22, 0x33, 0x44], 0x10).unwrap();

    let mut buf = [0u8; 4];
    driver.read(0x10, &mut buf).unwrap();
    assert_eq!(buf, [0x11, 0x22, 0x33, 0x44]);
}

#[derive(Default)]
struct RecordingProgress {
    events: Vec<(&'static str, usize)>,
}

impl Progress for RecordingProgress {
    fn erasing(&mut self, sectors: usize) {
        self.events.push(("erasing", sectors));
    }

    fn erase_progress(&mut self, sectors_erased: usize) {
        self.events.push(("erased", sectors_erased));
    }

    fn writing(&mut self, bytes: usize) {
        self.events.push(("writing", bytes));
    }

    fn write_progress(&mut self, bytes_written: usize) {
        self.events.push(("written", bytes_written));
    }

    fn complete(&mut self) {
        self.events.push(("complete", 0));
    }
}

#[test]
fn test_progress_reporting() {
    let mut bank = bank(DeviceType::Cc26x0);
    let mut progress = RecordingProgress::default();

    bank.erase_sectors(0, 1, &mut progress).unwrap();
    bank.program(0, &pattern(0x1800), &mut progress).unwrap();

    assert_eq!(
        progress.events,
        [
            ("erasing", 2),
            ("erased", 1),
            ("erased", 2),
            ("complete", 0),
            ("writing", 0x1800),
            ("written", 0x1000),
            ("written", 0x1800),
            ("complete", 0),
        ]
    );
}

#[test]
fn test_working_area_reported() {
    let mut target = DummyTarget::for_device(DeviceType::Cc26x0);
    let area = target.alloc_working_area(0x3C00).unwrap();
    assert_eq!(
        area,
        WorkingArea {
            address: 0x2000_0000,
            size: 0x3C00
        }
    );
    // Single reservation
    assert_eq!(
        target.alloc_working_area(0x100),
        Err(Error::WorkingAreaUnavailable)
    );
    target.free_working_area(area);
    assert!(target.working_area().is_none());
}
