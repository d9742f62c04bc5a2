//! Device type definitions

use core::fmt;

use super::ids::*;

/// Resolved device type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceType {
    /// CC26x0 (Chameleon)
    Cc26x0,
    /// CC26x1 (Chameleon)
    Cc26x1,
    /// CC13x0 (Chameleon)
    Cc13x0,
    /// CC26x2 (Agama)
    Cc26x2,
    /// CC13x2 (Agama, sub-GHz sibling of CC26x2)
    Cc13x2,
    /// Not probed yet
    #[default]
    NoType,
}

impl DeviceType {
    /// Human readable type name as shown by `info`
    pub const fn name(self) -> &'static str {
        match self {
            DeviceType::Cc26x0 => "CC26x0",
            DeviceType::Cc26x1 => "CC26x1",
            DeviceType::Cc13x0 => "CC13x0",
            DeviceType::Cc13x2 => "CC13x2",
            DeviceType::Cc26x2 => "CC26x2",
            DeviceType::NoType => "Unrecognized",
        }
    }

    /// Family this type belongs to, if known
    pub const fn family(self) -> Option<Family> {
        match self {
            DeviceType::Cc26x0 | DeviceType::Cc26x1 | DeviceType::Cc13x0 => {
                Some(Family::Chameleon)
            }
            DeviceType::Cc26x2 | DeviceType::Cc13x2 => Some(Family::Agama),
            DeviceType::NoType => None,
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Silicon family, sharing sector geometry and algorithm memory layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// CC26x0, CC26x1 and CC13x0 devices
    Chameleon,
    /// CC26x2 and CC13x2 devices, and every unrecognised id
    Agama,
}

impl Family {
    /// Classify an ICEPick id
    ///
    /// Unknown chip ids fall into the Agama family, matching how the
    /// helper algorithm selection treats them.
    pub const fn from_icepick_id(icepick_id: u32) -> Self {
        match icepick_id & ICEPICK_ID_MASK {
            CC26X0_ICEPICK_ID | CC26X1_ICEPICK_ID | CC13X0_ICEPICK_ID => Family::Chameleon,
            _ => Family::Agama,
        }
    }

    /// Short name used in diagnostics
    pub const fn name(self) -> &'static str {
        match self {
            Family::Chameleon => "cc26x0",
            Family::Agama => "cc26x2",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw identification register values and the type resolved from them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeviceIdentity {
    /// FCFG1 ICEPick id register value
    pub icepick_id: u32,
    /// FCFG1 user id register value
    pub user_id: u32,
    /// Device type resolved from the two ids
    pub device_type: DeviceType,
}

impl DeviceIdentity {
    /// Resolve an identity from raw register values
    pub fn new(icepick_id: u32, user_id: u32) -> Self {
        Self {
            icepick_id,
            user_id,
            device_type: super::device_type(icepick_id, user_id),
        }
    }

    /// Silicon revision field of the ICEPick id
    pub fn revision(&self) -> u32 {
        (self.icepick_id & ICEPICK_REV_MASK) >> 28
    }
}
