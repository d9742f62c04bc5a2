//! Per-family algorithm profile selected at probe time

use alloc::sync::Arc;

use super::image::AlgorithmImages;
use super::layout::{layout_for, AlgoLayout};
use crate::device::{self, Family};

/// Constants bound to a bank once its family is known
#[derive(Debug, Clone)]
pub struct FamilyProfile {
    /// Family the profile was selected for
    pub family: Family,
    /// Flash sector length in bytes
    pub sector_length: u32,
    /// SRAM size table applying to the probed silicon revision
    pub sram_table: &'static [u32; 4],
    /// Algorithm memory layout
    pub layout: &'static AlgoLayout,
    /// Algorithm image, if one was supplied for this family
    pub image: Option<Arc<[u8]>>,
}

impl FamilyProfile {
    /// Select the profile for a probed ICEPick id
    pub fn select(icepick_id: u32, images: &AlgorithmImages) -> Self {
        let family = Family::from_icepick_id(icepick_id);
        Self {
            family,
            sector_length: device::sector_length(icepick_id),
            sram_table: device::sram_table(icepick_id),
            layout: layout_for(family),
            image: images.get(family).cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::ids::{CC13X0_ICEPICK_ID, CC13X2_CC26X2_ICEPICK_ID};
    use alloc::vec;

    #[test]
    fn test_select_binds_family_image() {
        let images = AlgorithmImages::new()
            .with_image(Family::Chameleon, vec![0x11u8; 16])
            .with_image(Family::Agama, vec![0x22u8; 32]);

        let profile = FamilyProfile::select(CC13X0_ICEPICK_ID, &images);
        assert_eq!(profile.family, Family::Chameleon);
        assert_eq!(profile.sector_length, 0x1000);
        assert_eq!(profile.image.as_deref().map(|i| i.len()), Some(16));
        assert_eq!(profile.layout.working_size, 0x3C00);

        let profile = FamilyProfile::select(CC13X2_CC26X2_ICEPICK_ID, &images);
        assert_eq!(profile.family, Family::Agama);
        assert_eq!(profile.sector_length, 0x2000);
        assert_eq!(profile.image.as_deref().map(|i| i[0]), Some(0x22));
    }

    #[test]
    fn test_select_without_image() {
        let profile = FamilyProfile::select(CC13X0_ICEPICK_ID, &AlgorithmImages::new());
        assert!(profile.image.is_none());
    }
}
