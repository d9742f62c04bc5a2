//! Human readable bank description

use alloc::string::String;
use core::fmt::{self, Write};

use super::Cc26xxBank;
use crate::error::{Error, Result};
use crate::target::DebugTarget;

/// `fmt::Write` sink over a fixed byte buffer
struct SliceWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl Write for SliceWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let end = self.pos.checked_add(s.len()).ok_or(fmt::Error)?;
        let dst = self.buf.get_mut(self.pos..end).ok_or(fmt::Error)?;
        dst.copy_from_slice(s.as_bytes());
        self.pos = end;
        Ok(())
    }
}

impl<T: DebugTarget> Cc26xxBank<T> {
    fn write_info(&self, out: &mut impl Write) -> fmt::Result {
        write!(
            out,
            "{} device: ICEPick ID 0x{:08x}, USER ID 0x{:08x}\nflash size = 0x{:x}, SRAM size = 0x{:x}",
            self.identity.device_type,
            self.identity.icepick_id,
            self.identity.user_id,
            self.size,
            self.sram_size
        )
    }

    /// Write the bank description into `buf`
    ///
    /// Returns the number of bytes written, or `Error::BufferTooSmall` if
    /// the description does not fit.
    pub fn info(&self, buf: &mut [u8]) -> Result<usize> {
        let mut writer = SliceWriter { buf, pos: 0 };
        self.write_info(&mut writer)
            .map_err(|_| Error::BufferTooSmall)?;
        Ok(writer.pos)
    }

    /// Bank description as a string
    pub fn info_string(&self) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail
        let _ = self.write_info(&mut out);
        out
    }
}
