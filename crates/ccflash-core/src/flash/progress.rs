//! Progress reporting for long running flash operations

/// Callback for progress reporting during erase and program operations
pub trait Progress {
    /// Called when starting to erase `sectors` sectors
    fn erasing(&mut self, sectors: usize);

    /// Called after each sector erase command has been handed over
    fn erase_progress(&mut self, sectors_erased: usize);

    /// Called when starting to program `bytes` bytes
    fn writing(&mut self, bytes: usize);

    /// Called after each chunk has been handed over
    fn write_progress(&mut self, bytes_written: usize);

    /// Called when the operation completed successfully
    fn complete(&mut self);
}

/// A no-op progress reporter
pub struct NoProgress;

impl Progress for NoProgress {
    fn erasing(&mut self, _sectors: usize) {}
    fn erase_progress(&mut self, _sectors_erased: usize) {}
    fn writing(&mut self, _bytes: usize) {}
    fn write_progress(&mut self, _bytes_written: usize) {}
    fn complete(&mut self) {}
}
