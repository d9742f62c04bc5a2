//! Helper algorithm images
//!
//! The images are compiled machine code supplied by the user. They are
//! treated as opaque byte strings and uploaded as-is.

use alloc::sync::Arc;

use crate::device::Family;

#[cfg(feature = "std")]
use super::layout::layout_for;

/// Algorithm images, one per family
#[derive(Debug, Clone, Default)]
pub struct AlgorithmImages {
    chameleon: Option<Arc<[u8]>>,
    agama: Option<Arc<[u8]>>,
}

impl AlgorithmImages {
    /// Create an empty image set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the image of a family
    pub fn with_image(mut self, family: Family, image: impl Into<Arc<[u8]>>) -> Self {
        self.set(family, image);
        self
    }

    /// Add or replace the image of a family
    pub fn set(&mut self, family: Family, image: impl Into<Arc<[u8]>>) {
        let slot = match family {
            Family::Chameleon => &mut self.chameleon,
            Family::Agama => &mut self.agama,
        };
        *slot = Some(image.into());
    }

    /// Image of a family, if loaded
    pub fn get(&self, family: Family) -> Option<&Arc<[u8]>> {
        match family {
            Family::Chameleon => self.chameleon.as_ref(),
            Family::Agama => self.agama.as_ref(),
        }
    }

    /// Number of loaded images
    pub fn len(&self) -> usize {
        self.chameleon.is_some() as usize + self.agama.is_some() as usize
    }

    /// Whether no image is loaded
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// File name an image is looked up under in an image directory
    pub fn file_name(family: Family) -> &'static str {
        match family {
            Family::Chameleon => "cc26x0_algo.bin",
            Family::Agama => "cc26x2_algo.bin",
        }
    }
}

/// Error loading an algorithm image from disk
#[cfg(feature = "std")]
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    /// Reading the file failed
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that was read
        path: std::path::PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The file is empty
    #[error("algorithm image {0} is empty")]
    Empty(std::path::PathBuf),

    /// The image would overlap the parameter blocks
    #[error("{family} algorithm image is {size} bytes, at most {max} fit the working area")]
    TooLarge {
        /// Family the image was loaded for
        family: Family,
        /// Image size in bytes
        size: usize,
        /// Largest size the layout allows
        max: usize,
    },
}

#[cfg(feature = "std")]
impl AlgorithmImages {
    /// Load one family's image from a file
    pub fn load_file(
        &mut self,
        family: Family,
        path: impl AsRef<std::path::Path>,
    ) -> Result<(), ImageError> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|source| ImageError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if data.is_empty() {
            return Err(ImageError::Empty(path.to_path_buf()));
        }

        let max = layout_for(family).max_image_size();
        if data.len() > max {
            return Err(ImageError::TooLarge {
                family,
                size: data.len(),
                max,
            });
        }

        log::debug!(
            "Loaded {} algorithm image ({} bytes) from {}",
            family,
            data.len(),
            path.display()
        );
        self.set(family, data);
        Ok(())
    }

    /// Load every image present in a directory
    ///
    /// Missing files are skipped; returns the number of images loaded.
    pub fn load_dir(&mut self, dir: impl AsRef<std::path::Path>) -> Result<usize, ImageError> {
        let dir = dir.as_ref();
        let mut count = 0;
        for family in [Family::Chameleon, Family::Agama] {
            let path = dir.join(Self::file_name(family));
            if path.is_file() {
                self.load_file(family, &path)?;
                count += 1;
            } else {
                log::debug!("No {} algorithm image at {}", family, path.display());
            }
        }
        Ok(count)
    }
}
