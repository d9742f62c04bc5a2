//! Helper algorithm lifecycle
//!
//! Every flash operation runs inside [`Cc26xxBank::with_algorithm`]: the
//! algorithm is uploaded and started, the operation talks to it through a
//! [`CommandChannel`], and the target is halted and the working area
//! released afterwards no matter how the operation ended.

use super::channel::{CommandChannel, FLASH_TIMEOUT_MS};
use super::layout::ALGO_BASE_ADDRESS;
use crate::bank::{Cc26xxBank, EraseState};
use crate::error::{Error, Result};
use crate::target::{DebugTarget, ExecutionContext};

impl<T: DebugTarget> Cc26xxBank<T> {
    /// Upload and start the helper algorithm
    ///
    /// On failure, whatever this call reserved has been released again.
    pub(crate) fn algo_init(&mut self) -> Result<()> {
        self.auto_probe()?;

        let profile = self.require_probed()?;
        let family = profile.family;
        let layout = profile.layout;
        let image = profile.image.clone().ok_or_else(|| {
            log::error!("{}: No flash helper algorithm image loaded", family);
            Error::AlgorithmImageMissing
        })?;

        if let Some(stale) = self.working_area.take() {
            log::debug!("Releasing stale working area at 0x{:08X}", stale.address);
            self.target.free_working_area(stale);
        }

        let area = self
            .target
            .alloc_working_area(layout.working_size)
            .inspect_err(|_| {
                log::error!(
                    "No working area of 0x{:x} bytes available",
                    layout.working_size
                )
            })?;

        if area.address != ALGO_BASE_ADDRESS {
            log::error!(
                "Working area at 0x{:08X}, flash helper algorithm needs 0x{:08X}",
                area.address,
                ALGO_BASE_ADDRESS
            );
            self.target.free_working_area(area);
            return Err(Error::WorkingAreaMismatch {
                expected: ALGO_BASE_ADDRESS,
                actual: area.address,
            });
        }
        self.working_area = Some(area);

        if let Err(e) = self.target.write_memory(ALGO_BASE_ADDRESS, &image) {
            log::error!("{}: Failed to load flash helper algorithm", family);
            self.release_working_area();
            return Err(e);
        }

        self.exec_ctx = ExecutionContext::armv7m_thread();

        if let Err(e) = self.target.start_algorithm(layout.entry, &self.exec_ctx) {
            log::error!("{}: Failed to start flash helper algorithm", family);
            self.release_working_area();
            return Err(e);
        }

        log::debug!(
            "{}: flash helper algorithm ({} bytes) running at 0x{:08X}",
            family,
            image.len(),
            layout.entry
        );

        // Nothing is known about the flash contents once the algorithm runs
        self.mark_all(EraseState::Unknown);
        Ok(())
    }

    /// Halt the helper algorithm and release its working area
    ///
    /// Returns the result of waiting for the algorithm to stop.
    pub(crate) fn algo_quit(&mut self) -> Result<()> {
        if let Err(e) = self.target.halt() {
            log::debug!("Halt before algorithm teardown failed: {}", e);
        }

        let result = self.target.wait_algorithm(&self.exec_ctx, FLASH_TIMEOUT_MS);
        self.release_working_area();

        log::debug!("flash helper algorithm stopped");
        result
    }

    fn release_working_area(&mut self) {
        if let Some(area) = self.working_area.take() {
            self.target.free_working_area(area);
        }
    }

    /// Run `op` against a freshly started helper algorithm
    ///
    /// The algorithm is torn down exactly once after `op` returns. An error
    /// from `op` always wins; a teardown error after a successful `op` is
    /// only logged.
    pub fn with_algorithm<R>(
        &mut self,
        op: impl FnOnce(&mut CommandChannel<'_, T>) -> Result<R>,
    ) -> Result<R> {
        self.algo_init()?;

        let profile = self.require_probed()?;
        let (layout, family) = (profile.layout, profile.family);

        let result = {
            let mut channel = CommandChannel::new(&mut self.target, layout, family);
            op(&mut channel)
        };

        let quit = self.algo_quit();

        match (result, quit) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(value), Err(e)) => {
                log::warn!("{}: flash helper algorithm teardown failed: {}", family, e);
                Ok(value)
            }
            (Err(e), _) => Err(e),
        }
    }
}
