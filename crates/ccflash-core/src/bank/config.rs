//! Bank definition
//!
//! A bank is declared like any other flash bank:
//!
//! ```text
//! <name> <driver> <base> <size> <chip_width> <bus_width> [target]
//! ```
//!
//! Base and size are placeholders here; the real values come from the
//! device at probe time. With the `std` feature the same information can
//! be loaded from a TOML file:
//!
//! ```toml
//! [bank]
//! name = "cc26xx.flash"
//! base = 0x0
//! bank_number = 0
//! target = "cc26xx.cpu"
//!
//! [algorithms]
//! chameleon = "algo/cc26x0_algo.bin"
//! agama = "algo/cc26x2_algo.bin"
//! ```

use alloc::string::{String, ToString};

use crate::error::{Error, Result};

/// Driver name banks of this type are declared with
pub const DRIVER_NAME: &str = "cc26xx";

/// Static description of a flash bank
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Deserialize))]
#[cfg_attr(feature = "std", serde(default))]
pub struct BankConfig {
    /// Bank name
    pub name: String,
    /// Driver the bank was declared with
    pub driver: String,
    /// Declared base address
    #[cfg_attr(feature = "std", serde(deserialize_with = "toml_file::deserialize_hex_u32"))]
    pub base: u32,
    /// Declared size
    #[cfg_attr(feature = "std", serde(deserialize_with = "toml_file::deserialize_hex_u32"))]
    pub size: u32,
    /// Chip width in bytes
    pub chip_width: u32,
    /// Bus width in bytes
    pub bus_width: u32,
    /// Name of the target the bank belongs to
    pub target: Option<String>,
    /// Position of the bank on its target; only bank 0 is handled
    pub bank_number: u32,
}

impl Default for BankConfig {
    fn default() -> Self {
        Self {
            name: String::from("cc26xx.flash"),
            driver: String::from(DRIVER_NAME),
            base: 0,
            size: 0,
            chip_width: 0,
            bus_width: 0,
            target: None,
            bank_number: 0,
        }
    }
}

impl BankConfig {
    /// Build a bank from a flash bank argument list
    ///
    /// At least six arguments are required.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self> {
        if args.len() < 6 {
            log::error!("flash bank needs at least 6 arguments, got {}", args.len());
            return Err(Error::CommandSyntax);
        }

        let arg = |i: usize| args[i].as_ref();

        Ok(Self {
            name: arg(0).to_string(),
            driver: arg(1).to_string(),
            base: parse_number(arg(2))?,
            size: parse_number(arg(3))?,
            chip_width: parse_number(arg(4))?,
            bus_width: parse_number(arg(5))?,
            target: args.get(6).map(|t| t.as_ref().to_string()),
            bank_number: 0,
        })
    }

    /// Parse a whitespace separated flash bank command line
    pub fn from_command_line(line: &str) -> Result<Self> {
        let args: alloc::vec::Vec<&str> = line.split_whitespace().collect();
        Self::from_args(&args)
    }

    /// Set the bank number
    pub fn with_bank_number(mut self, bank_number: u32) -> Self {
        self.bank_number = bank_number;
        self
    }
}

/// Parse a number that can be hex (0x...) or decimal
pub fn parse_number(s: &str) -> Result<u32> {
    let s = s.trim();
    let parsed = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16)
    } else {
        s.parse()
    };
    parsed.map_err(|_| {
        log::error!("invalid number: {}", s);
        Error::CommandSyntax
    })
}

#[cfg(feature = "std")]
pub use toml_file::{AlgorithmPaths, ConfigError, ConfigFile};

#[cfg(feature = "std")]
mod toml_file {
    use std::path::{Path, PathBuf};
    use std::string::String;

    use super::BankConfig;
    use crate::algo::{AlgorithmImages, ImageError};
    use crate::device::Family;

    /// Error loading a configuration file
    #[derive(Debug, thiserror::Error)]
    pub enum ConfigError {
        /// Reading the file failed
        #[error("failed to read {path}: {source}")]
        Io {
            /// Path that was read
            path: PathBuf,
            /// Underlying I/O error
            #[source]
            source: std::io::Error,
        },

        /// The file is not valid TOML or has the wrong shape
        #[error("invalid configuration: {0}")]
        Parse(#[from] toml::de::Error),

        /// An algorithm image named by the file could not be loaded
        #[error(transparent)]
        Image(#[from] ImageError),
    }

    /// Algorithm image paths, relative to the configuration file
    #[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
    pub struct AlgorithmPaths {
        /// Image for CC26x0/CC26x1/CC13x0 devices
        pub chameleon: Option<PathBuf>,
        /// Image for CC26x2/CC13x2 devices
        pub agama: Option<PathBuf>,
    }

    impl AlgorithmPaths {
        /// Load every configured image, resolving relative paths against `base_dir`
        pub fn load(&self, base_dir: &Path) -> Result<AlgorithmImages, ConfigError> {
            let mut images = AlgorithmImages::new();
            for (family, path) in [
                (Family::Chameleon, &self.chameleon),
                (Family::Agama, &self.agama),
            ] {
                if let Some(path) = path {
                    images.load_file(family, base_dir.join(path))?;
                }
            }
            Ok(images)
        }
    }

    /// Contents of a configuration file
    #[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
    #[serde(default)]
    pub struct ConfigFile {
        /// Bank definition
        pub bank: BankConfig,
        /// Algorithm images
        pub algorithms: AlgorithmPaths,
    }

    impl ConfigFile {
        /// Parse a configuration from a TOML string
        pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
            Ok(toml::from_str(content)?)
        }

        /// Load a configuration from a TOML file
        pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
            let path = path.as_ref();
            let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            Self::from_toml_str(&content)
        }
    }

    /// Deserialize a u32 that can be hex (0x...) or decimal
    pub(super) fn deserialize_hex_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::Deserialize;

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum HexOrInt {
            Int(u32),
            Str(String),
        }

        match HexOrInt::deserialize(deserializer)? {
            HexOrInt::Int(n) => Ok(n),
            HexOrInt::Str(s) => super::parse_number(&s)
                .map_err(|_| serde::de::Error::custom(std::format!("invalid number: {}", s))),
        }
    }
}
