//! Fixed target memory layout of the flash helper algorithms
//!
//! The algorithm images are linked for absolute addresses, so everything
//! here is a compile-time constant per family.

use crate::device::{Family, AGAMA_SECTOR_LENGTH, CHAMELEON_SECTOR_LENGTH};

/// Address the algorithm image is linked for; the working area must start here
pub const ALGO_BASE_ADDRESS: u32 = 0x2000_0000;

/// Offset of the status word inside a parameter block
pub const STATUS_OFFSET: u32 = 0x0C;

/// One of the two command slots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Slot 0
    First,
    /// Slot 1
    Second,
}

impl Slot {
    /// The other slot
    pub const fn flip(self) -> Self {
        match self {
            Slot::First => Slot::Second,
            Slot::Second => Slot::First,
        }
    }

    /// Slot number as used in diagnostics
    pub const fn index(self) -> usize {
        match self {
            Slot::First => 0,
            Slot::Second => 1,
        }
    }
}

/// Address triple of one command slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotAddresses {
    /// Data buffer the algorithm programs from
    pub buffer: u32,
    /// Parameter block the host writes commands to
    pub params: u32,
    /// Status word the algorithm clears when it has consumed a command
    pub status: u32,
}

impl SlotAddresses {
    const fn new(buffer: u32, params: u32) -> Self {
        Self {
            buffer,
            params,
            status: params + STATUS_OFFSET,
        }
    }
}

/// Memory layout of a family's helper algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlgoLayout {
    /// Address execution starts at
    pub entry: u32,
    /// Bytes of working area the algorithm and its buffers occupy
    pub working_size: u32,
    /// Slot address triples, indexed by [`Slot::index`]
    pub slots: [SlotAddresses; 2],
}

impl AlgoLayout {
    const fn new(buffers: [u32; 2], params: [u32; 2], sector_length: u32) -> Self {
        Self {
            entry: ALGO_BASE_ADDRESS,
            // The second buffer is the last thing in the working area
            working_size: buffers[1] + sector_length - ALGO_BASE_ADDRESS,
            slots: [
                SlotAddresses::new(buffers[0], params[0]),
                SlotAddresses::new(buffers[1], params[1]),
            ],
        }
    }

    /// Addresses of the given slot
    pub fn slot(&self, slot: Slot) -> &SlotAddresses {
        &self.slots[slot.index()]
    }

    /// Largest image that fits below the first parameter block
    pub fn max_image_size(&self) -> usize {
        let lowest = if self.slots[0].params < self.slots[1].params {
            self.slots[0].params
        } else {
            self.slots[1].params
        };
        (lowest - ALGO_BASE_ADDRESS) as usize
    }
}

/// Layout of the CC26x0/CC26x1/CC13x0 algorithm
pub static CHAMELEON_LAYOUT: AlgoLayout = AlgoLayout::new(
    [0x2000_1C00, 0x2000_2C00],
    [0x2000_1BD8, 0x2000_1BEC],
    CHAMELEON_SECTOR_LENGTH,
);

/// Layout of the CC26x2/CC13x2 algorithm
pub static AGAMA_LAYOUT: AlgoLayout = AlgoLayout::new(
    [0x2000_2000, 0x2000_4000],
    [0x2000_1FD8, 0x2000_1FEC],
    AGAMA_SECTOR_LENGTH,
);

/// Layout used for a family
pub fn layout_for(family: Family) -> &'static AlgoLayout {
    match family {
        Family::Chameleon => &CHAMELEON_LAYOUT,
        Family::Agama => &AGAMA_LAYOUT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_flip() {
        assert_eq!(Slot::First.flip(), Slot::Second);
        assert_eq!(Slot::Second.flip(), Slot::First);
        assert_eq!(Slot::First.flip().flip(), Slot::First);
    }

    #[test]
    fn test_chameleon_layout() {
        let layout = layout_for(Family::Chameleon);
        assert_eq!(layout.entry, ALGO_BASE_ADDRESS);
        assert_eq!(layout.working_size, 0x3C00);
        assert_eq!(layout.slot(Slot::First).status, 0x2000_1BE4);
        assert_eq!(layout.slot(Slot::Second).status, 0x2000_1BF8);
        assert_eq!(layout.max_image_size(), 0x1BD8);
    }

    #[test]
    fn test_agama_layout() {
        let layout = layout_for(Family::Agama);
        assert_eq!(layout.working_size, 0x6000);
        assert_eq!(layout.slot(Slot::First).buffer, 0x2000_2000);
        assert_eq!(layout.slot(Slot::Second).buffer, 0x2000_4000);
        assert_eq!(layout.slot(Slot::Second).status, 0x2000_1FF8);
    }

    #[test]
    fn test_buffers_hold_a_sector() {
        for (family, sector) in [
            (Family::Chameleon, CHAMELEON_SECTOR_LENGTH),
            (Family::Agama, AGAMA_SECTOR_LENGTH),
        ] {
            let layout = layout_for(family);
            assert!(layout.slots[1].buffer - layout.slots[0].buffer >= sector);
            assert!(layout.slots[1].params + 20 <= layout.slots[0].buffer);
        }
    }
}
