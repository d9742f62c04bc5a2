//! Flash driver interface
//!
//! [`FlashDriver`] is the surface a flash framework drives. Reading and
//! blank checking have generic implementations on top of plain target
//! memory reads.

use alloc::vec::Vec;

use crate::bank::{Cc26xxBank, EraseState, Sector};
use crate::error::{Error, Result};
use crate::target::DebugTarget;

use super::progress::NoProgress;

/// The erased value of flash memory
const ERASED_VALUE: u8 = 0xFF;

/// Flash driver trait
pub trait FlashDriver {
    /// Identify the device
    fn probe(&mut self) -> Result<()>;

    /// Identify the device unless already done
    fn auto_probe(&mut self) -> Result<()>;

    /// Base address of the bank
    fn base(&self) -> u32;

    /// Size of the bank in bytes
    fn size(&self) -> u32;

    /// Sector list
    fn sectors(&self) -> &[Sector];

    /// Record the erase state of a sector
    fn set_erase_state(&mut self, sector: usize, state: EraseState);

    /// Erase sectors `first..=last`
    fn erase(&mut self, first: usize, last: usize) -> Result<()>;

    /// Program `buffer` at `offset` from the bank base
    fn write(&mut self, buffer: &[u8], offset: u32) -> Result<()>;

    /// Read raw target memory
    fn read_memory(&mut self, addr: u32, buf: &mut [u8]) -> Result<()>;

    /// Set or clear write protection on sectors `first..=last`
    fn protect(&mut self, set: bool, first: usize, last: usize) -> Result<()>;

    /// Refresh the protection state of all sectors
    fn protect_check(&mut self) -> Result<()>;

    /// Describe the bank into `buf`, returning the number of bytes written
    fn info(&self, buf: &mut [u8]) -> Result<usize>;

    /// Read flash contents at `offset` from the bank base
    fn read(&mut self, offset: u32, buf: &mut [u8]) -> Result<()> {
        self.auto_probe()?;

        let len = u32::try_from(buf.len()).map_err(|_| Error::AddressOutOfBounds)?;
        match offset.checked_add(len) {
            Some(end) if end <= self.size() => {}
            _ => return Err(Error::AddressOutOfBounds),
        }

        self.read_memory(self.base() + offset, buf)
    }

    /// Determine the erase state of every sector by reading it back
    fn erase_check(&mut self) -> Result<()> {
        self.auto_probe()?;

        let base = self.base();
        let count = self.sectors().len();
        let mut buf = Vec::new();

        for i in 0..count {
            let sector = self.sectors()[i];
            buf.resize(sector.size as usize, 0u8);
            self.read_memory(base + sector.offset, &mut buf)?;

            let state = if buf.iter().all(|&b| b == ERASED_VALUE) {
                EraseState::Erased
            } else {
                EraseState::Dirty
            };
            self.set_erase_state(i, state);
        }

        Ok(())
    }
}

impl<T: DebugTarget> FlashDriver for Cc26xxBank<T> {
    fn probe(&mut self) -> Result<()> {
        Cc26xxBank::probe(self)
    }

    fn auto_probe(&mut self) -> Result<()> {
        Cc26xxBank::auto_probe(self)
    }

    fn base(&self) -> u32 {
        self.base
    }

    fn size(&self) -> u32 {
        self.size
    }

    fn sectors(&self) -> &[Sector] {
        &self.sectors
    }

    fn set_erase_state(&mut self, sector: usize, state: EraseState) {
        if let Some(sector) = self.sectors.get_mut(sector) {
            sector.erased = state;
        }
    }

    fn erase(&mut self, first: usize, last: usize) -> Result<()> {
        self.erase_sectors(first, last, &mut NoProgress)
    }

    fn write(&mut self, buffer: &[u8], offset: u32) -> Result<()> {
        self.program(offset, buffer, &mut NoProgress)
    }

    fn read_memory(&mut self, addr: u32, buf: &mut [u8]) -> Result<()> {
        self.target.read_memory(addr, buf)
    }

    fn protect(&mut self, _set: bool, _first: usize, _last: usize) -> Result<()> {
        Ok(())
    }

    fn protect_check(&mut self) -> Result<()> {
        Ok(())
    }

    fn info(&self, buf: &mut [u8]) -> Result<usize> {
        Cc26xxBank::info(self, buf)
    }
}
