//! Erase and program sequences
//!
//! Each operation runs inside one helper algorithm session. Sector state is
//! only updated once the whole sequence, including the final drain, has
//! succeeded.

use crate::algo::{Command, Slot, KEEP_ALIVE_THRESHOLD_MS};
use crate::bank::{Cc26xxBank, EraseState};
use crate::error::{Error, Result};
use crate::target::{require_halted, DebugTarget};

use super::progress::Progress;

/// Length the algorithm is given for erase commands
const ERASE_COMMAND_LENGTH: u32 = 4;

/// Word placed in the data buffers before sector erases
const ERASED_WORD: [u8; 4] = [0xFF; 4];

impl<T: DebugTarget> Cc26xxBank<T> {
    /// Erase the whole main flash bank
    pub fn mass_erase(&mut self, progress: &mut dyn Progress) -> Result<()> {
        require_halted(&self.target)?;
        self.auto_probe()?;

        let count = self.sectors.len();
        progress.erasing(count);

        self.with_algorithm(|channel| {
            channel.submit_and_await(Command::EraseAll, 0, ERASE_COMMAND_LENGTH)
        })?;

        self.mark_all(EraseState::Erased);
        progress.erase_progress(count);
        progress.complete();
        log::info!("Mass erase complete");
        Ok(())
    }

    /// Erase sectors `first..=last`
    ///
    /// Requesting every sector of bank 0 is turned into a mass erase.
    pub fn erase_sectors(
        &mut self,
        first: usize,
        last: usize,
        progress: &mut dyn Progress,
    ) -> Result<()> {
        require_halted(&self.target)?;
        self.auto_probe()?;

        let count = self.sectors.len();
        if first > last || last >= count {
            log::error!(
                "Sector range {}..={} outside of {} sectors",
                first,
                last,
                count
            );
            return Err(Error::SectorOutOfRange);
        }

        if self.config.bank_number == 0 && first == 0 && last == count - 1 {
            return self.mass_erase(progress);
        }

        let base = self.base;
        let sector_length = self.sector_length;
        progress.erasing(last - first + 1);

        self.with_algorithm(|channel| {
            channel.write_buffer(Slot::First, &ERASED_WORD)?;
            if last > first {
                channel.write_buffer(Slot::Second, &ERASED_WORD)?;
            }

            for (n, sector) in (first..=last).enumerate() {
                let address = base + sector as u32 * sector_length;
                channel.submit(Command::EraseAndProgram, address, ERASE_COMMAND_LENGTH)?;
                progress.erase_progress(n + 1);
            }

            channel.finish()
        })?;

        self.mark_sectors(first, last, EraseState::Erased);
        progress.complete();
        log::info!("Erased sectors {}..={}", first, last);
        Ok(())
    }

    /// Program `data` at `offset` from the bank base
    ///
    /// The target range must already be erased. Programming nothing is a
    /// no-op that does not touch the target.
    pub fn program(&mut self, offset: u32, data: &[u8], progress: &mut dyn Progress) -> Result<()> {
        if data.is_empty() {
            return Ok(());
        }

        require_halted(&self.target)?;
        self.auto_probe()?;

        let len = u32::try_from(data.len()).map_err(|_| Error::AddressOutOfBounds)?;
        match offset.checked_add(len) {
            Some(end) if end <= self.size => {}
            _ => {
                log::error!(
                    "Write of 0x{:x} bytes at 0x{:x} exceeds bank size 0x{:x}",
                    len,
                    offset,
                    self.size
                );
                return Err(Error::AddressOutOfBounds);
            }
        }

        let base = self.base;
        let sector_length = self.sector_length;
        progress.writing(data.len());

        self.with_algorithm(|channel| {
            let start = channel.target().now_ms();
            let mut address = base + offset;
            let mut written = 0usize;

            for chunk in data.chunks(sector_length as usize) {
                channel.load_buffer(chunk)?;
                channel.submit(Command::Program, address, chunk.len() as u32)?;

                address += chunk.len() as u32;
                written += chunk.len();
                progress.write_progress(written);

                let target = channel.target();
                if target.now_ms().saturating_sub(start) > KEEP_ALIVE_THRESHOLD_MS {
                    target.keep_alive();
                }
            }

            channel.finish()
        })?;

        let first = (offset / sector_length) as usize;
        let last = ((offset + len - 1) / sector_length) as usize;
        self.mark_sectors(first, last, EraseState::Dirty);
        progress.complete();
        log::info!("Programmed 0x{:x} bytes at 0x{:08x}", len, base + offset);
        Ok(())
    }
}
