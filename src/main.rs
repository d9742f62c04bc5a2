//! ccflash - Flash programmer for TI CC26xx/CC13xx devices
//!
//! ccflash drives the on-chip flash of CC26xx and CC13xx wireless MCUs
//! through a debug target. The device is identified from its
//! identification registers, a flash helper algorithm is uploaded into
//! SRAM, and erase and program commands are streamed to it.
//!
//! # Algorithm images
//!
//! The helper algorithms are not part of ccflash. They are loaded from
//! `--algo-dir` (files `cc26x0_algo.bin` and `cc26x2_algo.bin`) or from the
//! `[algorithms]` table of a `--config` file.

mod cli;
mod commands;
mod targets;

use ccflash_core::bank::ConfigFile;
use ccflash_core::{AlgorithmImages, BankConfig};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Set log level based on verbosity
    match cli.verbose {
        0 => {} // default (info)
        1 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    }

    if let Commands::ListTargets = cli.command {
        commands::list_targets();
        return Ok(());
    }

    let (config, images) = load_setup(&cli)?;

    match cli.command {
        Commands::Probe { target } => {
            let mut bank = commands::open_bank(&target.target, config, images)?;
            commands::cmd_probe(&mut bank)
        }
        Commands::Info { target } => {
            let mut bank = commands::open_bank(&target.target, config, images)?;
            commands::cmd_info(&mut bank)
        }
        Commands::Erase {
            target,
            first,
            last,
        } => {
            let mut bank = commands::open_bank(&target.target, config, images)?;
            let range = first.zip(last);
            commands::cmd_erase(&mut bank, range)
        }
        Commands::Write {
            target,
            input,
            offset,
            no_erase,
        } => {
            let mut bank = commands::open_bank(&target.target, config, images)?;
            commands::cmd_write(&mut bank, &input, offset, no_erase)
        }
        Commands::Read {
            target,
            output,
            offset,
            length,
        } => {
            let mut bank = commands::open_bank(&target.target, config, images)?;
            commands::cmd_read(&mut bank, &output, offset, length)
        }
        Commands::BlankCheck { target } => {
            let mut bank = commands::open_bank(&target.target, config, images)?;
            commands::cmd_blank_check(&mut bank)
        }
        Commands::ListTargets => Ok(()),
    }
}

/// Build the bank definition and algorithm images from the global options
///
/// `--bank` overrides the `[bank]` table of the config file, images from
/// `--algo-dir` override those named by the config file.
fn load_setup(cli: &Cli) -> Result<(BankConfig, AlgorithmImages), Box<dyn std::error::Error>> {
    let (mut config, mut images) = match &cli.config {
        Some(path) => {
            let file = ConfigFile::from_toml_file(path)?;
            let base_dir = path.parent().unwrap_or(Path::new("."));
            let images = file.algorithms.load(base_dir)?;
            log::info!("Loaded configuration from {}", path.display());
            (file.bank, images)
        }
        None => (BankConfig::default(), AlgorithmImages::new()),
    };

    if let Some(line) = &cli.bank {
        config = BankConfig::from_command_line(line)
            .map_err(|e| format!("Invalid bank definition '{}': {}", line, e))?;
    }

    if let Some(dir) = &cli.algo_dir {
        let count = images.load_dir(dir)?;
        log::info!(
            "Loaded {} algorithm image(s) from {}",
            count,
            dir.display()
        );
    }

    if images.is_empty() {
        log::warn!("No flash helper algorithm images loaded, erase and write will fail");
    }

    Ok((config, images))
}
