//! CLI command implementations
//!
//! Every device command works on a [`Bank`]: a CC26xx flash bank on top of
//! whichever debug target was selected with `--target`.

mod blank_check;
mod erase;
mod list;
mod probe;
mod progress;
mod read;
mod write;

pub use blank_check::cmd_blank_check;
pub use erase::cmd_erase;
pub use list::list_targets;
pub use probe::{cmd_info, cmd_probe};
pub use read::cmd_read;
pub use write::cmd_write;

use ccflash_core::{AlgorithmImages, BankConfig, Cc26xxBank, DebugTarget};

use crate::targets;

/// Flash bank on a dynamically selected target
pub type Bank = Cc26xxBank<Box<dyn DebugTarget + Send>>;

/// Open the target named by `spec` and wrap it in a flash bank
pub fn open_bank(
    spec: &str,
    config: BankConfig,
    images: AlgorithmImages,
) -> Result<Bank, Box<dyn std::error::Error>> {
    let target = targets::open_target(spec)?;
    log::debug!(
        "Opened target '{}' for bank {} ({})",
        spec,
        config.name,
        config.driver
    );
    Ok(Cc26xxBank::new(target, config, images))
}
