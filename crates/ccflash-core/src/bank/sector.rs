//! Sector bookkeeping

/// What is known about a sector's contents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EraseState {
    /// Not known since the last probe or algorithm start
    #[default]
    Unknown,
    /// Known to be erased
    Erased,
    /// Known to hold programmed data
    Dirty,
}

impl EraseState {
    /// Raw value as used by flash frameworks (-1 unknown, 1 erased, 0 dirty)
    pub const fn raw(self) -> i32 {
        match self {
            EraseState::Unknown => -1,
            EraseState::Erased => 1,
            EraseState::Dirty => 0,
        }
    }
}

/// One flash sector of a bank
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sector {
    /// Offset from the bank base
    pub offset: u32,
    /// Size in bytes
    pub size: u32,
    /// Known erase state
    pub erased: EraseState,
    /// Write protection state; CC26xx sectors are never reported protected
    pub protected: bool,
}

impl Sector {
    /// Sector at `offset` with unknown contents
    pub const fn new(offset: u32, size: u32) -> Self {
        Self {
            offset,
            size,
            erased: EraseState::Unknown,
            protected: false,
        }
    }

    /// Whether `offset` (relative to the bank base) falls in this sector
    pub fn contains(&self, offset: u32) -> bool {
        offset >= self.offset && offset - self.offset < self.size
    }
}
