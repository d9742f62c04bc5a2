//! CLI argument parsing

use crate::targets;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Parse a string as a hex or decimal u32
fn parse_hex_u32(s: &str) -> Result<u32, String> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).map_err(|e| format!("Invalid hex value: {}", e))
    } else {
        s.parse::<u32>().map_err(|e| format!("Invalid number: {}", e))
    }
}

/// Generate dynamic help text for the target argument
fn target_help() -> String {
    format!("Debug target to use [available: {}]", targets::target_names())
}

#[derive(Parser)]
#[command(name = "ccflash")]
#[command(author, version, about = "CC26xx/CC13xx flash programmer", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (TOML) with the bank definition and algorithm images
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory containing cc26x0_algo.bin and/or cc26x2_algo.bin
    #[arg(long, global = true)]
    pub algo_dir: Option<PathBuf>,

    /// Bank definition: "<name> <driver> <base> <size> <chip_width> <bus_width> [target]"
    #[arg(long, global = true)]
    pub bank: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Target selection shared by all device commands
#[derive(clap::Args, Debug, Clone)]
pub struct TargetArgs {
    #[arg(short, long, default_value = "dummy", help = target_help())]
    pub target: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Identify the device
    Probe {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Show device and flash bank information
    Info {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Erase flash sectors (whole bank if no range is given)
    Erase {
        #[command(flatten)]
        target: TargetArgs,

        /// First sector to erase
        #[arg(long, requires = "last")]
        first: Option<usize>,

        /// Last sector to erase (inclusive)
        #[arg(long, requires = "first")]
        last: Option<usize>,
    },

    /// Program a file into flash
    Write {
        #[command(flatten)]
        target: TargetArgs,

        /// Input file path
        #[arg(short, long)]
        input: PathBuf,

        /// Offset from the start of the bank (hex with 0x prefix or decimal)
        #[arg(long, value_parser = parse_hex_u32, default_value = "0")]
        offset: u32,

        /// Do not erase the touched sectors first
        #[arg(long)]
        no_erase: bool,
    },

    /// Read flash contents to a file
    Read {
        #[command(flatten)]
        target: TargetArgs,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Offset from the start of the bank (hex with 0x prefix or decimal)
        #[arg(long, value_parser = parse_hex_u32, default_value = "0")]
        offset: u32,

        /// Number of bytes to read (default: to the end of the bank)
        #[arg(long, value_parser = parse_hex_u32)]
        length: Option<u32>,
    },

    /// Determine which sectors are erased by reading them back
    BlankCheck {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// List available debug targets
    ListTargets,
}
