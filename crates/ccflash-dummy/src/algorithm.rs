//! Emulated flash helper algorithm
//!
//! The emulation watches host writes to the two parameter blocks. A block
//! written with a full status is queued; commands complete strictly in
//! issue order, one poll of a status word at a time, so the host sees the
//! same pipelining a real algorithm gives.

use std::collections::VecDeque;

use ccflash_core::algo::{AlgoParamBlock, BufferStatus, Command, Slot, PARAM_BLOCK_SIZE};

use crate::DummyTarget;

/// Status the emulation reports for commands it cannot execute
const ALGO_ERROR_STATUS: u32 = 0x0000_0BAD;

/// A command as seen by the emulated algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssuedCommand {
    /// Slot the command was issued on
    pub slot: Slot,
    /// Decoded command, `None` for an unknown command word
    pub command: Option<Command>,
    /// Flash address
    pub address: u32,
    /// Byte count
    pub length: u32,
}

#[derive(Debug)]
struct Pending {
    slot: Slot,
    polls_left: u32,
}

/// State of a running algorithm
#[derive(Debug, Default)]
pub(crate) struct Algorithm {
    pending: VecDeque<Pending>,
}

const SLOTS: [Slot; 2] = [Slot::First, Slot::Second];

impl DummyTarget {
    pub(crate) fn start_emulation(&mut self) {
        // The algorithm starts with both mailboxes empty
        let layout = self.layout();
        for slot in SLOTS {
            self.set_sram_word(layout.slot(slot).status, BufferStatus::EMPTY);
        }
        self.algorithm = Some(Algorithm::default());
        log::debug!("dummy: {} algorithm started", self.config.family());
    }

    fn slot_busy(&self, slot: Slot) -> bool {
        self.sram_word(self.layout().slot(slot).status) == BufferStatus::FULL
    }

    /// Count host writes that touch a slot the algorithm still owns
    pub(crate) fn check_slot_write(&mut self, addr: u32, len: usize) {
        if self.algorithm.is_none() {
            return;
        }
        let layout = self.layout();
        let sector_length = self.config.sector_length();
        let end = addr as u64 + len as u64;

        for slot in SLOTS {
            let s = layout.slot(slot);
            let overlaps = |start: u32, size: u32| {
                (addr as u64) < start as u64 + size as u64 && end > start as u64
            };
            let touched =
                overlaps(s.params, PARAM_BLOCK_SIZE as u32) || overlaps(s.buffer, sector_length);
            if touched && self.slot_busy(slot) {
                log::warn!("dummy: host wrote to busy slot {}", slot.index());
                self.stats.protocol_violations += 1;
            }
        }
    }

    /// Queue a command once a full parameter block has been written
    pub(crate) fn on_params_written(&mut self, addr: u32, len: usize) {
        let layout = self.layout();
        let Some(slot) = SLOTS
            .into_iter()
            .find(|&slot| layout.slot(slot).params == addr && len == PARAM_BLOCK_SIZE)
        else {
            return;
        };
        if !self.slot_busy(slot) {
            return;
        }

        let latency = self.config.algorithm_latency;
        let Some(block) = self
            .sram_slice(addr, PARAM_BLOCK_SIZE)
            .and_then(AlgoParamBlock::parse)
        else {
            return;
        };
        let Some(algorithm) = self.algorithm.as_mut() else {
            return;
        };

        algorithm.pending.push_back(Pending {
            slot,
            polls_left: latency,
        });
        self.stats.commands.push(IssuedCommand {
            slot,
            command: block.command(),
            address: block.address.get(),
            length: block.length.get(),
        });
    }

    /// Let the algorithm make progress when the host polls a status word
    pub(crate) fn poll_algorithm(&mut self, addr: u32) {
        let layout = self.layout();
        if !SLOTS.iter().any(|&s| layout.slot(s).status == addr) {
            return;
        }
        if self.faults.stall_algorithm {
            return;
        }
        let Some(algorithm) = self.algorithm.as_mut() else {
            return;
        };
        let Some(front) = algorithm.pending.front_mut() else {
            return;
        };

        if front.polls_left > 0 {
            front.polls_left -= 1;
            return;
        }

        let slot = front.slot;
        algorithm.pending.pop_front();

        let status = if self.execute(slot) {
            self.faults.corrupt_status.unwrap_or(BufferStatus::EMPTY)
        } else {
            ALGO_ERROR_STATUS
        };
        self.set_sram_word(layout.slot(slot).status, status);
    }

    fn execute(&mut self, slot: Slot) -> bool {
        let layout = self.layout();
        let Some(block) = self
            .sram_slice(layout.slot(slot).params, PARAM_BLOCK_SIZE)
            .and_then(AlgoParamBlock::parse)
        else {
            return false;
        };

        let address = block.address.get() as usize;
        let length = block.length.get() as usize;
        let sector_length = self.config.sector_length() as usize;

        match block.command() {
            Some(Command::EraseAll) => {
                self.flash.fill(0xFF);
                true
            }
            Some(Command::EraseAndProgram) => {
                let start = address - address % sector_length;
                let Some(sector) = self.flash.get_mut(start..start + sector_length) else {
                    return false;
                };
                sector.fill(0xFF);
                self.program(address, block.buffer.get(), length)
            }
            Some(Command::Program) => self.program(address, block.buffer.get(), length),
            None => false,
        }
    }

    fn program(&mut self, address: usize, buffer: u32, length: usize) -> bool {
        let Some(data) = self.sram_slice(buffer, length).map(<[u8]>::to_vec) else {
            return false;
        };
        let Some(dst) = self.flash.get_mut(address..address + length) else {
            return false;
        };
        // Programming can only clear bits
        for (d, s) in dst.iter_mut().zip(data) {
            *d &= s;
        }
        true
    }
}
